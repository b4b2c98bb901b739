use crate::decoder::bitstream::BitReader;
use crate::error::{QrError, Result};

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
pub const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Index of `c` in the alphanumeric set
pub fn alphanumeric_value(c: char) -> Option<u32> {
    ALPHANUMERIC_TABLE
        .iter()
        .position(|&a| a == c)
        .map(|i| i as u32)
}

/// Alphanumeric mode decoder (Mode 0010)
/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<String> {
        let truncated = QrError::MalformedData("truncated alphanumeric segment");
        let out_of_range = QrError::MalformedData("alphanumeric value out of range");
        let mut result = String::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining >= 2 {
            let value = reader.read(11).ok_or(truncated.clone())? as usize;
            if value >= 45 * 45 {
                return Err(out_of_range);
            }
            result.push(ALPHANUMERIC_TABLE[value / 45]);
            result.push(ALPHANUMERIC_TABLE[value % 45]);
            chars_remaining -= 2;
        }

        if chars_remaining == 1 {
            let value = reader.read(6).ok_or(truncated)? as usize;
            let c = ALPHANUMERIC_TABLE.get(value).ok_or(out_of_range)?;
            result.push(*c);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_decode() {
        // "A1" = 10 * 45 + 1 = 451 = 00111000011
        let bytes = [0b0011_1000, 0b0110_0000];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(AlphanumericDecoder::decode(&mut reader, 2).unwrap(), "A1");
    }

    #[test]
    fn test_alphanumeric_odd_length() {
        // "A1" followed by ":" (44 = 101100)
        let bytes = [0b0011_1000, 0b0111_0110, 0b0000_0000];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(AlphanumericDecoder::decode(&mut reader, 3).unwrap(), "A1:");
    }

    #[test]
    fn test_alphanumeric_value() {
        assert_eq!(alphanumeric_value('0'), Some(0));
        assert_eq!(alphanumeric_value('Z'), Some(35));
        assert_eq!(alphanumeric_value(':'), Some(44));
        assert_eq!(alphanumeric_value('a'), None);
    }

    #[test]
    fn test_truncated_segment() {
        let bytes = [0b0011_1000];
        let mut reader = BitReader::new(&bytes);
        assert!(AlphanumericDecoder::decode(&mut reader, 2).is_err());
    }
}
