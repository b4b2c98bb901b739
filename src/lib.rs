//! qr_codec - QR code encoding and decoding
//!
//! Encode text into a QR Model 2 module matrix, render it, and read symbols
//! back from luminance images (camera frames, screenshots, rendered bitmaps).
//!
//! ```
//! use qr_codec::{ECLevel, render::Renderer};
//!
//! let matrix = qr_codec::encode("HELLO", ECLevel::M).unwrap();
//! let image = Renderer::default().to_luma(&matrix);
//! let (width, height) = (image.width() as usize, image.height() as usize);
//! let qr = qr_codec::decode(image.as_raw(), width, height).unwrap();
//! assert_eq!(qr.content, "HELLO");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Encoder and decoder options
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (finder patterns, alignment, sampling)
pub mod detector;
/// Reed-Solomon and BCH codes
pub mod ec;
/// Text to module matrix
pub mod encoder;
/// Error type
pub mod error;
/// Core data structures (QRCode, BitMatrix, Point, etc.)
pub mod models;
mod pipeline;
/// Module matrix to raster image
pub mod render;
/// Camera frame boundary
pub mod scanner;
/// Symbol layout shared by encoder and decoder
pub mod symbol;
/// Utility functions (grayscale, binarization, geometry)
pub mod utils;

pub use config::{BinarizerKind, DecodeOptions, EncodeOptions};
pub use encoder::{EncodedSymbol, encode_symbol};
pub use error::{QrError, Result};
pub use models::{BitMatrix, ECLevel, MaskPattern, Mode, Point, QRCode, Version};
pub use render::{QrColor, Renderer};
pub use scanner::{Frame, FrameScanner, ScanOutcome};

use decoder::QrDecoder;
use tracing::debug;
use utils::binarization::{hybrid_binarize, otsu_binarize};
use utils::grayscale::{rgb_to_grayscale, rgba_to_grayscale};

/// Encode `text` at `ec_level`, choosing the smallest version and the
/// lowest-penalty mask
pub fn encode(text: &str, ec_level: ECLevel) -> Result<BitMatrix> {
    encode_with(text, &EncodeOptions::new(ec_level))
}

/// Encode `text` with explicit options
pub fn encode_with(text: &str, options: &EncodeOptions) -> Result<BitMatrix> {
    encode_symbol(text, options).map(|symbol| symbol.matrix)
}

fn check_buffer(len: usize, width: usize, height: usize, channels: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(QrError::InvalidInput(format!(
            "image must be non-empty, got {width}x{height}"
        )));
    }
    let expected = width * height * channels;
    if len != expected {
        return Err(QrError::InvalidInput(format!(
            "buffer holds {len} bytes, {width}x{height}x{channels} needs {expected}"
        )));
    }
    Ok(())
}

/// Decode one QR code from an 8-bit luminance image (`width * height` bytes)
pub fn decode(luminance: &[u8], width: usize, height: usize) -> Result<QRCode> {
    decode_with(luminance, width, height, &DecodeOptions::default())
}

/// Decode with explicit options
pub fn decode_with(
    luminance: &[u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Result<QRCode> {
    check_buffer(luminance.len(), width, height, 1)?;
    let binary = match options.binarizer {
        BinarizerKind::Hybrid => hybrid_binarize(luminance, width, height),
        BinarizerKind::Otsu => otsu_binarize(luminance, width, height),
    };
    debug!(width, height, binarizer = ?options.binarizer, "binarized");
    pipeline::decode_binary(&binary, options)
}

/// Decode the luminance plane of a camera frame
pub fn decode_frame(frame: &Frame<'_>) -> Result<QRCode> {
    decode_frame_with(frame, &DecodeOptions::default())
}

/// Decode a camera frame with explicit options
pub fn decode_frame_with(frame: &Frame<'_>, options: &DecodeOptions) -> Result<QRCode> {
    let luma = frame.luma();
    decode_with(&luma, frame.width(), frame.height(), options)
}

/// Decode from packed RGB (3 bytes per pixel)
pub fn decode_rgb(rgb: &[u8], width: usize, height: usize) -> Result<QRCode> {
    check_buffer(rgb.len(), width, height, 3)?;
    decode(&rgb_to_grayscale(rgb, width, height), width, height)
}

/// Decode from packed RGBA (4 bytes per pixel)
pub fn decode_rgba(rgba: &[u8], width: usize, height: usize) -> Result<QRCode> {
    check_buffer(rgba.len(), width, height, 4)?;
    decode(&rgba_to_grayscale(rgba, width, height), width, height)
}

/// Decode an already sampled, upright module grid (true = dark)
pub fn decode_matrix(matrix: &BitMatrix) -> Result<QRCode> {
    QrDecoder::decode_matrix(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_validation() {
        assert!(matches!(
            decode(&[0u8; 10], 4, 4),
            Err(QrError::InvalidInput(_))
        ));
        assert!(matches!(
            decode_rgb(&[0u8; 16], 4, 4),
            Err(QrError::InvalidInput(_))
        ));
        assert!(matches!(decode(&[], 0, 0), Err(QrError::InvalidInput(_))));
    }

    #[test]
    fn test_matrix_round_trip() {
        let matrix = encode("lib round trip", ECLevel::Q).unwrap();
        let qr = decode_matrix(&matrix).unwrap();
        assert_eq!(qr.content, "lib round trip");
        assert_eq!(qr.error_correction, ECLevel::Q);
    }

    #[test]
    fn test_rendered_symbol_decodes() {
        let matrix = encode("https://example.com/qr", ECLevel::M).unwrap();
        let image = Renderer {
            scale: 4,
            ..Renderer::default()
        }
        .to_luma(&matrix);
        let qr = decode(
            image.as_raw(),
            image.width() as usize,
            image.height() as usize,
        )
        .unwrap();
        assert_eq!(qr.content, "https://example.com/qr");
        assert!(!qr.mirrored);
        let [tl, tr, _, bl] = qr.position;
        assert!((tl.x - 16.0).abs() < 1.5 && (tl.y - 16.0).abs() < 1.5, "{tl:?}");
        assert!(tr.x > tl.x && bl.y > tl.y);
    }
}
