use crate::decoder::bitstream::BitReader;
use crate::error::{QrError, Result};

/// Byte mode decoder (Mode 0100) for 8-bit data
pub struct ByteDecoder;

impl ByteDecoder {
    /// Read `character_count` raw bytes. Interpreting them as text is up to the caller.
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<Vec<u8>> {
        if character_count * 8 > reader.available() {
            return Err(QrError::MalformedData("truncated byte segment"));
        }
        let mut bytes = Vec::with_capacity(character_count);
        for _ in 0..character_count {
            let byte = reader
                .read(8)
                .ok_or(QrError::MalformedData("truncated byte segment"))?;
            bytes.push(byte as u8);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_decode() {
        let bytes = [0x48, 0x49];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(ByteDecoder::decode(&mut reader, 2).unwrap(), b"HI");
    }

    #[test]
    fn test_byte_count_exceeds_stream() {
        let bytes = [0x48];
        let mut reader = BitReader::new(&bytes);
        assert!(ByteDecoder::decode(&mut reader, 2).is_err());
    }
}
