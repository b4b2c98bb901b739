/// Perspective transforms between module space and image space
use crate::models::Point;

/// Perspective transformation matrix (3x3, a33 = 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Transform mapping each `src[i]` onto `dst[i]`, `None` for degenerate quads
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform: two equations per correspondence
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(&a, &b)?;
        Some(Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        })
    }

    /// Transform a point using this perspective matrix
    pub fn transform(&self, p: &Point) -> Point {
        let (x, y) = (p.x as f64, p.y as f64);
        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-12 {
            return Point::new(f32::NAN, f32::NAN);
        }
        let x_new = (self.a11 * x + self.a12 * y + self.a13) / denominator;
        let y_new = (self.a21 * x + self.a22 * y + self.a23) / denominator;
        Point::new(x_new as f32, y_new as f32)
    }
}

/// Solve 8x8 linear system using Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }
        if max_val < 1e-12 {
            return None;
        }
        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(&b) < 1e-2
    }

    #[test]
    fn test_scaling_transform() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(close(t.transform(&Point::new(50.0, 50.0)), Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_maps_corners_exactly() {
        let src = [
            Point::new(3.5, 3.5),
            Point::new(29.5, 3.5),
            Point::new(26.5, 26.5),
            Point::new(3.5, 29.5),
        ];
        let dst = [
            Point::new(812.0, 140.0),
            Point::new(1504.0, 230.0),
            Point::new(1390.0, 905.0),
            Point::new(760.0, 840.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(&dst) {
            assert!(close(t.transform(s), *d), "{s:?} -> {d:?}");
        }
    }

    #[test]
    fn test_degenerate_quad() {
        let collinear = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        assert!(PerspectiveTransform::from_points(&collinear, &collinear).is_none());
    }
}
