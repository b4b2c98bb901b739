//! Image helpers used by the detector
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Binarization (hybrid block-local, Otsu and fixed threshold)
//! - Geometry (perspective transforms)

pub mod binarization;
pub mod geometry;
pub mod grayscale;
