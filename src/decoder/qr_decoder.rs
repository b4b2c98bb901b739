//! Module grid to decoded content: format info, de-masking, codeword
//! extraction, block correction and segment parsing.

use crate::error::{QrError, Result};
use crate::models::{BitMatrix, QRCode, Version};
use crate::symbol::format::read_format_info;
use crate::symbol::placement::{apply_mask, data_positions};
use crate::symbol::version::read_version_info;
use crate::symbol::FunctionMask;
use tracing::debug;

mod blocks;
mod payload;

pub(crate) use blocks::deinterleave_and_correct;
pub(crate) use payload::decode_payload;

/// Decoder for an already sampled, upright module grid
pub struct QrDecoder;

impl QrDecoder {
    /// Decode a square `dimension x dimension` module grid (true = dark)
    pub fn decode_matrix(matrix: &BitMatrix) -> Result<QRCode> {
        let dimension = matrix.width();
        if matrix.height() != dimension {
            return Err(QrError::InvalidInput(format!(
                "module grid is {}x{}, expected a square",
                dimension,
                matrix.height()
            )));
        }
        let version = Version::from_dimension(dimension).ok_or_else(|| {
            QrError::InvalidInput(format!("{dimension} is not a QR symbol dimension"))
        })?;

        let (ec_level, mask_pattern) = read_format_info(matrix).ok_or(QrError::FormatInfoError)?;
        debug!(%version, ?ec_level, ?mask_pattern, "format information");

        if let Some(declared) = read_version_info(matrix) {
            if declared != version {
                debug!(%declared, %version, "version block disagrees with grid size");
            }
        }

        let func = FunctionMask::new(version);
        let mut unmasked = matrix.clone();
        apply_mask(&mut unmasked, mask_pattern, &func);

        let codewords = Self::read_codewords(&unmasked, &func, version.total_codewords());
        let data_codewords = deinterleave_and_correct(&codewords, version, ec_level)?;
        let (data, content) = decode_payload(&data_codewords, version)?;

        Ok(QRCode::new(data, content, version, ec_level, mask_pattern))
    }

    /// Pack data modules into codewords, MSB first; trailing remainder bits are dropped
    fn read_codewords(matrix: &BitMatrix, func: &FunctionMask, count: usize) -> Vec<u8> {
        data_positions(func)
            .chunks_exact(8)
            .take(count)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u8, |byte, &(x, y)| (byte << 1) | u8::from(matrix.get(x, y)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
