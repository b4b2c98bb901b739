/// MSB-first reader over corrected data codewords
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bits not yet consumed
    pub fn available(&self) -> usize {
        self.bytes.len() * 8 - self.position
    }

    /// Read `count` (at most 32) bits as an unsigned value, `None` past the end
    pub fn read(&mut self, count: usize) -> Option<u32> {
        if count > 32 || count > self.available() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.bytes[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_across_bytes() {
        let bytes = [0b1010_1100, 0b0101_0011];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read(3), Some(0b101));
        assert_eq!(reader.read(9), Some(0b0_1100_0101));
        assert_eq!(reader.available(), 4);
        assert_eq!(reader.read(5), None);
        assert_eq!(reader.read(4), Some(0b0011));
        assert_eq!(reader.read(0), Some(0));
    }
}
