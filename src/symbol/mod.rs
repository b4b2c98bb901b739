//! Symbol layout shared by the encoder and the decoder: block tables,
//! function-pattern mask, codeword placement order and the format/version
//! information areas.

pub mod format;
pub mod function_mask;
pub mod placement;
pub mod tables;
pub mod version;

pub use function_mask::{FunctionMask, alignment_centers, alignment_pattern_positions};
pub use tables::BlockLayout;
