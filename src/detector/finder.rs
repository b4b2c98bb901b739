/// Finder pattern detection using 1:1:3:1:1 run scanning with cross-checks
use crate::models::{BitMatrix, Point};

/// Candidate finder pattern centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Centre in continuous image coordinates (pixel `i` spans `[i, i + 1)`)
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f32,
    /// Number of scan lines that confirmed this centre
    pub count: usize,
}

impl FinderPattern {
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            count: 1,
        }
    }

    /// Same centre within one module and a similar module size
    fn about_equals(&self, other: &FinderPattern) -> bool {
        let dx = (self.center.x - other.center.x).abs();
        let dy = (self.center.y - other.center.y).abs();
        if dx > self.module_size || dy > self.module_size {
            return false;
        }
        let size_diff = (self.module_size - other.module_size).abs();
        size_diff <= 1.0 || size_diff <= self.module_size * 0.5
    }

    /// Fold another observation in, weighting by confirmation counts
    fn combine(&mut self, other: &FinderPattern) {
        let total = (self.count + other.count) as f32;
        let w_self = self.count as f32 / total;
        let w_other = other.count as f32 / total;
        self.center = Point::new(
            self.center.x * w_self + other.center.x * w_other,
            self.center.y * w_self + other.center.y * w_other,
        );
        self.module_size = self.module_size * w_self + other.module_size * w_other;
        self.count += other.count;
    }
}

/// Module size for five dark/light/dark/light/dark runs in 1:1:3:1:1 proportion,
/// each outer run within half a module and the centre within one module.
fn check_ratios(counts: &[usize; 5]) -> Option<f32> {
    let total: usize = counts.iter().sum();
    if total < 7 || counts.iter().any(|&c| c == 0) {
        return None;
    }
    let unit = total as f32 / 7.0;
    let tolerance = unit / 2.0;
    let outer_ok = [0, 1, 3, 4]
        .iter()
        .all(|&i| (counts[i] as f32 - unit).abs() < tolerance);
    let center_ok = (counts[2] as f32 - 3.0 * unit).abs() < 2.0 * tolerance;
    (outer_ok && center_ok).then_some(unit)
}

/// Centre of the middle run given the index just past the last run
fn center_from_end(counts: &[usize; 5], end: isize) -> f32 {
    end as f32 - counts[4] as f32 - counts[3] as f32 - counts[2] as f32 / 2.0
}

pub struct FinderDetector;

impl FinderDetector {
    /// All confirmed finder candidates, most confirmed first
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut candidates: Vec<FinderPattern> = Vec::new();

        for y in 0..matrix.height() {
            if !Self::has_significant_edges(matrix, y) {
                continue;
            }
            for (center_x, counts) in Self::scan_row(matrix, y) {
                if let Some(pattern) = Self::confirm(matrix, center_x, y, &counts) {
                    match candidates.iter_mut().find(|c| c.about_equals(&pattern)) {
                        Some(existing) => existing.combine(&pattern),
                        None => candidates.push(pattern),
                    }
                }
            }
        }

        candidates.sort_by(|a, b| b.count.cmp(&a.count));
        candidates
    }

    /// Check if row has enough colour transitions to potentially contain a pattern
    fn has_significant_edges(matrix: &BitMatrix, y: usize) -> bool {
        let mut transitions = 0;
        let mut previous = false;
        for color in matrix.row(y) {
            if color != previous {
                transitions += 1;
                if transitions >= 4 {
                    return true;
                }
                previous = color;
            }
        }
        false
    }

    /// Horizontal 1:1:3:1:1 hits on row `y`: centre x and run lengths
    fn scan_row(matrix: &BitMatrix, y: usize) -> Vec<(f32, [usize; 5])> {
        let mut hits = Vec::new();
        let mut run_lengths: Vec<usize> = Vec::new();
        let mut run_colors: Vec<bool> = Vec::new();
        let mut run_start = 0usize;
        let mut current_color = matrix.get(0, y);
        let width = matrix.width();

        // A run ending at the right edge still closes the pattern
        for x in 1..=width {
            let color = if x < width { matrix.get(x, y) } else { !current_color };
            if color == current_color {
                continue;
            }
            run_lengths.push(x - run_start);
            run_colors.push(current_color);
            run_start = x;
            current_color = color;

            let n = run_colors.len();
            if n >= 5 && run_colors[n - 1] && !run_colors[n - 2] && run_colors[n - 3] {
                let counts: [usize; 5] = [
                    run_lengths[n - 5],
                    run_lengths[n - 4],
                    run_lengths[n - 3],
                    run_lengths[n - 2],
                    run_lengths[n - 1],
                ];
                if check_ratios(&counts).is_some() {
                    hits.push((center_from_end(&counts, x as isize), counts));
                }
            }
        }

        hits
    }

    /// Cross-check a horizontal hit vertically, then horizontally again through
    /// the refined centre
    fn confirm(
        matrix: &BitMatrix,
        center_x: f32,
        y: usize,
        counts: &[usize; 5],
    ) -> Option<FinderPattern> {
        let total: usize = counts.iter().sum();
        let column = center_x.floor() as isize;
        let (center_y, total_v) =
            Self::cross_check(matrix, (column, y as isize), (0, 1), counts[2], total)?;
        let row = center_y.floor() as isize;
        let (center_x, total_h) =
            Self::cross_check(matrix, (column, row), (1, 0), counts[2], total)?;
        let module_size = (total_h + total_v) as f32 / 14.0;
        Some(FinderPattern::new(center_x, center_y, module_size))
    }

    /// Walk both ways from `start` along `step` measuring the five runs.
    /// Returns the centre coordinate along the walked axis and the run total.
    fn cross_check(
        matrix: &BitMatrix,
        start: (isize, isize),
        step: (isize, isize),
        max_count: usize,
        original_total: usize,
    ) -> Option<(f32, usize)> {
        let limit = if step.0 != 0 {
            matrix.width() as isize
        } else {
            matrix.height() as isize
        };
        let base = if step.0 != 0 { start.0 } else { start.1 };
        let dark = |t: isize| matrix.get_or_white(start.0 + t * step.0, start.1 + t * step.1);
        let inside = |t: isize| (0..limit).contains(&(base + t));

        if !inside(0) || !dark(0) {
            return None;
        }
        let mut counts = [0usize; 5];

        // Backward: centre, light, dark
        let mut t = 0;
        while inside(t) && dark(t) {
            counts[2] += 1;
            t -= 1;
        }
        while inside(t) && !dark(t) && counts[1] <= max_count {
            counts[1] += 1;
            t -= 1;
        }
        if !inside(t) || counts[1] > max_count {
            return None;
        }
        while inside(t) && dark(t) && counts[0] <= max_count {
            counts[0] += 1;
            t -= 1;
        }
        if counts[0] > max_count {
            return None;
        }

        // Forward: rest of centre, light, dark
        let mut t = 1;
        while inside(t) && dark(t) {
            counts[2] += 1;
            t += 1;
        }
        while inside(t) && !dark(t) && counts[3] <= max_count {
            counts[3] += 1;
            t += 1;
        }
        if !inside(t) || counts[3] > max_count {
            return None;
        }
        while inside(t) && dark(t) && counts[4] <= max_count {
            counts[4] += 1;
            t += 1;
        }
        if counts[4] > max_count {
            return None;
        }

        let total: usize = counts.iter().sum();
        // Reject when the perpendicular size differs by 40% or more
        if 5 * total.abs_diff(original_total) >= 2 * original_total {
            return None;
        }
        check_ratios(&counts)?;
        Some((base as f32 + center_from_end(&counts, t), total))
    }
}
