/// Alignment pattern detection
/// Alignment patterns appear in QR codes version 2 and above: a 5x5 block with
/// a dark ring, a light ring and a single dark centre module.
use crate::models::{BitMatrix, Point};

/// Mismatching modules tolerated when accepting a template match
const MAX_MISMATCHES: usize = 3;

/// Symbol axes in image space, one module long each
#[derive(Debug, Clone, Copy)]
pub struct ModuleAxes {
    /// Image displacement of one module to the right
    pub across: Point,
    /// Image displacement of one module down
    pub down: Point,
}

impl ModuleAxes {
    /// Average module size in pixels
    pub fn module_size(&self) -> f32 {
        let across = self.across.x.hypot(self.across.y);
        let down = self.down.x.hypot(self.down.y);
        (across + down) / 2.0
    }
}

/// Template mismatches for an alignment pattern centred on `center`
fn mismatches(matrix: &BitMatrix, center: Point, axes: &ModuleAxes) -> usize {
    let mut count = 0;
    for j in -2i32..=2 {
        for i in -2i32..=2 {
            let ring = i.abs().max(j.abs());
            let expected = ring != 1;
            let x = center.x + i as f32 * axes.across.x + j as f32 * axes.down.x;
            let y = center.y + i as f32 * axes.across.y + j as f32 * axes.down.y;
            let actual = matrix.get_or_white(x.floor() as isize, y.floor() as isize);
            if actual != expected {
                count += 1;
            }
        }
    }
    count
}

/// Search a square window of `allowance` modules around `estimate` for the
/// alignment template. Returns the centroid of the best-matching positions.
pub fn find_alignment_pattern(
    matrix: &BitMatrix,
    estimate: Point,
    axes: &ModuleAxes,
    allowance: f32,
) -> Option<Point> {
    let radius = (allowance * axes.module_size()).ceil().max(2.0) as isize;
    let cx = estimate.x.floor() as isize;
    let cy = estimate.y.floor() as isize;

    let mut best = usize::MAX;
    let mut sum = (0.0f64, 0.0f64);
    let mut hits = 0usize;

    for y in cy - radius..=cy + radius {
        if y < 0 || y >= matrix.height() as isize {
            continue;
        }
        for x in cx - radius..=cx + radius {
            if x < 0 || x >= matrix.width() as isize {
                continue;
            }
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if !matrix.get(x as usize, y as usize) {
                continue;
            }
            let score = mismatches(matrix, center, axes);
            if score < best {
                best = score;
                sum = (0.0, 0.0);
                hits = 0;
            }
            if score == best {
                sum.0 += center.x as f64;
                sum.1 += center.y as f64;
                hits += 1;
            }
        }
    }

    if hits == 0 || best > MAX_MISMATCHES {
        return None;
    }
    Some(Point::new(
        (sum.0 / hits as f64) as f32,
        (sum.1 / hits as f64) as f32,
    ))
}
