//! Error-correction codes: Reed-Solomon over GF(256) for codeword blocks and
//! BCH for the format and version information words.

pub mod bch;
pub mod gf256;
pub mod reed_solomon;

pub use bch::BchCode;
pub use reed_solomon::{ReedSolomonDecoder, ReedSolomonEncoder, RsError};
