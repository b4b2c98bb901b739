//! Error type shared by the encoder, the detector and the decoder.

use crate::models::ECLevel;
use thiserror::Error;

/// Failure kinds surfaced by the codec.
///
/// Decoding a camera stream fails routinely with [`QrError::NotFound`];
/// the remaining decode variants mean a symbol was located but its content
/// could not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// The payload does not fit any version (or the forced version) at this EC level.
    #[error("payload needs {bits} data bits, more than any version holds at EC level {ec_level:?}")]
    CapacityExceeded {
        /// Bits required by the smallest possible encoding of the payload
        bits: usize,
        /// Requested error correction level
        ec_level: ECLevel,
    },
    /// No finder-pattern triangle could be located.
    #[error("no QR code found")]
    NotFound,
    /// Neither copy of the format information passed its BCH check.
    #[error("format information failed its integrity check")]
    FormatInfoError,
    /// Reed-Solomon correction exceeded the capacity of a block.
    #[error("block {block} has more errors than its parity can correct")]
    UncorrectableError {
        /// Index of the first failing block
        block: usize,
    },
    /// The corrected data stream contains an invalid or truncated segment.
    #[error("malformed data stream: {0}")]
    MalformedData(&'static str),
    /// Caller supplied inconsistent input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Checked access outside a bit matrix.
    #[error("({x}, {y}) is outside a {width}x{height} matrix")]
    OutOfBounds {
        /// Column
        x: usize,
        /// Row
        y: usize,
        /// Matrix width
        width: usize,
        /// Matrix height
        height: usize,
    },
}

impl QrError {
    /// True for the routine "nothing in this frame" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QrError::NotFound)
    }

    /// True when a symbol was found but its content is corrupt.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            QrError::FormatInfoError
                | QrError::UncorrectableError { .. }
                | QrError::MalformedData(_)
        )
    }

    /// How far into the decode pipeline this failure got. Used to report the
    /// most informative error when several candidates fail.
    pub(crate) fn progress(&self) -> u8 {
        match self {
            QrError::NotFound => 0,
            QrError::FormatInfoError => 1,
            QrError::UncorrectableError { .. } => 2,
            QrError::MalformedData(_) => 3,
            _ => 0,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = QrError> = std::result::Result<T, E>;
