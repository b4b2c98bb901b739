//! QR code detection modules
//!
//! Turns a binarized image plus an ordered finder triple into a sampled
//! module grid:
//! - Finder pattern detection (the three square markers)
//! - Alignment pattern refinement (versions 2 and up)
//! - Perspective sampling of module centres

/// Alignment pattern detection for QR versions 2+
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Sample grid extraction through a perspective transform
pub mod transform;

pub use finder::{FinderDetector, FinderPattern};

use crate::error::{QrError, Result};
use crate::models::{BitMatrix, Point, Version};
use crate::utils::geometry::PerspectiveTransform;
use alignment::{ModuleAxes, find_alignment_pattern};
use tracing::trace;

/// Alignment search windows tried in turn, in modules
const ALIGNMENT_ALLOWANCES: [f32; 2] = [4.0, 8.0];

/// Finder centres assigned to their corners of the symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderTriple {
    /// Finder at the right-angle corner
    pub top_left: Point,
    /// Finder clockwise from the top-left one
    pub top_right: Point,
    /// Remaining finder
    pub bottom_left: Point,
    /// Average module size of the three finders, in pixels
    pub module_size: f32,
}

impl FinderTriple {
    /// Symbol dimension implied by the finder spacing, snapped to `4v + 17`.
    /// `None` when the spacing cannot belong to any version.
    pub fn dimension(&self) -> Option<usize> {
        if self.module_size <= 0.0 {
            return None;
        }
        let across = (self.top_left.distance(&self.top_right) / self.module_size).round() as usize;
        let down = (self.top_left.distance(&self.bottom_left) / self.module_size).round() as usize;
        let dimension = (across + down) / 2 + 7;
        let dimension = match dimension & 3 {
            0 => dimension + 1,
            2 => dimension - 1,
            3 => return None,
            _ => dimension,
        };
        Version::from_dimension(dimension).map(|v| v.size())
    }
}

/// Grid read from the image together with where it was found
#[derive(Debug, Clone)]
pub struct DetectedSymbol {
    /// Sampled modules, true = dark
    pub grid: BitMatrix,
    /// Symbol corners in image space: top-left, top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
    /// Refined bottom-right alignment centre, when one was found
    pub alignment: Option<Point>,
}

/// Sample a `dimension`-module grid anchored on `finders`
pub fn detect_symbol(
    binary: &BitMatrix,
    finders: &FinderTriple,
    dimension: usize,
) -> Result<DetectedSymbol> {
    let d = dimension as f32;
    let between = d - 7.0;
    let (tl, tr, bl) = (finders.top_left, finders.top_right, finders.bottom_left);
    let axes = ModuleAxes {
        across: Point::new((tr.x - tl.x) / between, (tr.y - tl.y) / between),
        down: Point::new((bl.x - tl.x) / between, (bl.y - tl.y) / between),
    };
    let bottom_right = Point::new(tr.x - tl.x + bl.x, tr.y - tl.y + bl.y);

    let mut alignment = None;
    if dimension > Version::MIN.size() {
        // Centre of the bottom-right alignment pattern sits three modules in
        // from the bottom-right finder-centre position
        let correction = 1.0 - 3.0 / between;
        let estimate = Point::new(
            tl.x + correction * (bottom_right.x - tl.x),
            tl.y + correction * (bottom_right.y - tl.y),
        );
        alignment = ALIGNMENT_ALLOWANCES
            .iter()
            .find_map(|&allowance| find_alignment_pattern(binary, estimate, &axes, allowance));
        trace!(?estimate, ?alignment, "alignment search");
    }

    let (corner_src, corner_dst) = match alignment {
        Some(center) => (Point::new(d - 6.5, d - 6.5), center),
        None => (Point::new(d - 3.5, d - 3.5), bottom_right),
    };
    let src = [
        Point::new(3.5, 3.5),
        Point::new(d - 3.5, 3.5),
        corner_src,
        Point::new(3.5, d - 3.5),
    ];
    let dst = [tl, tr, corner_dst, bl];
    let transform = PerspectiveTransform::from_points(&src, &dst).ok_or(QrError::NotFound)?;

    let grid = transform::sample_grid(binary, &transform, dimension, axes.module_size())?;
    let corners = [
        transform.transform(&Point::new(0.0, 0.0)),
        transform.transform(&Point::new(d, 0.0)),
        transform.transform(&Point::new(d, d)),
        transform.transform(&Point::new(0.0, d)),
    ];

    Ok(DetectedSymbol {
        grid,
        corners,
        alignment,
    })
}
