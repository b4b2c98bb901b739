use crate::decoder::bitstream::BitReader;
use crate::error::{QrError, Result};

/// Numeric mode decoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<String> {
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let (bits_needed, limit) = match group_size {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };

            let value = reader
                .read(bits_needed)
                .ok_or(QrError::MalformedData("truncated numeric segment"))?;
            if value >= limit {
                return Err(QrError::MalformedData("numeric group out of range"));
            }

            result.push_str(&format!("{:0width$}", value, width = group_size));
            chars_remaining -= group_size;
        }

        Ok(result)
    }
}
