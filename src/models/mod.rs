//! Core data structures shared by the encoder and the decoder.

pub mod matrix;
pub mod point;
pub mod qr_code;

pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{ECLevel, MaskPattern, Mode, QRCode, Version};
