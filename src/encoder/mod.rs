//! Text to QR symbol.
//!
//! Pipeline: mode selection, version fitting, bit stream with terminator
//! and padding, Reed-Solomon blocks, interleaving, module placement and
//! mask selection.

mod bit_buffer;
mod codewords;
mod mask;
mod matrix;
mod segment;

pub use bit_buffer::BitBuffer;
pub use mask::penalty;
pub use segment::Segment;

use crate::config::EncodeOptions;
use crate::error::{QrError, Result};
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};
use matrix::SymbolBuilder;
use tracing::debug;

/// Encoded symbol with the parameters chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    /// Module grid, true = dark
    pub matrix: BitMatrix,
    /// Version used
    pub version: Version,
    /// Error correction level used
    pub ec_level: ECLevel,
    /// Mask applied
    pub mask: MaskPattern,
}

/// Smallest version that holds `segment`, or the forced one if it fits
fn choose_version(segment: &Segment, options: &EncodeOptions) -> Result<Version> {
    let fits = |v: Version| {
        segment
            .total_bits(v)
            .is_some_and(|bits| bits <= v.data_codewords(options.ec_level) * 8)
    };
    let chosen = match options.version {
        Some(v) => fits(v).then_some(v),
        None => Version::all().find(|&v| fits(v)),
    };
    chosen.ok_or(QrError::CapacityExceeded {
        bits: segment.bit_len(options.version.unwrap_or(Version::MAX)),
        ec_level: options.ec_level,
    })
}

/// Encode `text` into a symbol using `options`
pub fn encode_symbol(text: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
    let segment = Segment::from_text(text);
    let version = choose_version(&segment, options)?;
    let ec_level = options.ec_level;
    debug!(
        mode = ?segment.mode(),
        chars = segment.char_count(),
        %version,
        ?ec_level,
        "encoding"
    );

    let data = codewords::data_codewords(&segment, version, ec_level);
    let all = codewords::add_ec_and_interleave(&data, version, ec_level);

    let mut builder = SymbolBuilder::new(version);
    builder.place_codewords(&all);

    let (mask, matrix) = match options.mask {
        Some(mask) => (
            mask,
            mask::masked_symbol(&builder.modules, &builder.func, ec_level, mask),
        ),
        None => {
            let (mask, matrix, score) =
                mask::select_mask(&builder.modules, &builder.func, ec_level);
            debug!(?mask, penalty = score, "mask selected");
            (mask, matrix)
        }
    };

    Ok(EncodedSymbol {
        matrix,
        version,
        ec_level,
        mask,
    })
}
