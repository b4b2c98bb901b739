//! QR code decoding after detection
//!
//! - Format and version information
//! - De-masking and codeword extraction in placement order
//! - De-interleaving and Reed-Solomon correction per block
//! - Segment parsing (numeric, alphanumeric, byte, kanji, ECI)

/// MSB-first bit reader over data codewords
pub mod bitstream;
/// Data mode decoders
pub mod modes;
/// Module grid to decoded content
pub mod qr_decoder;

pub use qr_decoder::QrDecoder;
