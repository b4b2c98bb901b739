/// Module grid sampling through a perspective transform
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Modules smaller than this are read from a single pixel
const MAJORITY_MIN_MODULE: f32 = 3.0;

/// Read a `dimension` x `dimension` module grid. `transform` maps module space
/// (module `(x, y)` spans `[x, x + 1) x [y, y + 1)`) into image space.
///
/// Fails with [`QrError::NotFound`] when the grid reaches more than a module
/// past the image edge.
pub fn sample_grid(
    matrix: &BitMatrix,
    transform: &PerspectiveTransform,
    dimension: usize,
    module_size: f32,
) -> Result<BitMatrix> {
    let width = matrix.width() as f32;
    let height = matrix.height() as f32;
    let slack = module_size.max(1.0);
    let majority = module_size >= MAJORITY_MIN_MODULE;
    let mut grid = BitMatrix::square(dimension);

    for y in 0..dimension {
        for x in 0..dimension {
            let p = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if !p.x.is_finite()
                || !p.y.is_finite()
                || p.x < -slack
                || p.y < -slack
                || p.x > width + slack
                || p.y > height + slack
            {
                return Err(QrError::NotFound);
            }
            let px = p.x.floor() as isize;
            let py = p.y.floor() as isize;
            let dark = if majority {
                let votes = (-1..=1)
                    .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
                    .filter(|&(dx, dy)| matrix.get_or_white(px + dx, py + dy))
                    .count();
                votes >= 5
            } else {
                matrix.get_or_white(px, py)
            };
            if dark {
                grid.set(x, y, true);
            }
        }
    }

    Ok(grid)
}
