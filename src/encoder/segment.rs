use super::bit_buffer::BitBuffer;
use crate::decoder::modes::alphanumeric::alphanumeric_value;
use crate::decoder::modes::kanji::kanji_value;
use crate::models::{Mode, Version};
use encoding_rs::SHIFT_JIS;

/// One encoded data segment: mode, character count and payload bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    char_count: usize,
    payload: BitBuffer,
}

impl Segment {
    /// Encode `text` in the most compact single mode that can represent it.
    ///
    /// Digits only: numeric. Alphanumeric set only: alphanumeric. Every
    /// character a Shift JIS kanji: kanji. Anything else: UTF-8 bytes.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::bytes(&[]);
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return Self::numeric(text);
        }
        if text.chars().all(|c| alphanumeric_value(c).is_some()) {
            return Self::alphanumeric(text);
        }
        if let Some(segment) = Self::kanji(text) {
            return segment;
        }
        Self::bytes(text.as_bytes())
    }

    fn numeric(digits: &str) -> Self {
        let mut payload = BitBuffer::new();
        for group in digits.as_bytes().chunks(3) {
            let value = group
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'));
            payload.put_bits(value, group.len() * 3 + 1);
        }
        Self {
            mode: Mode::Numeric,
            char_count: digits.len(),
            payload,
        }
    }

    fn alphanumeric(text: &str) -> Self {
        let values: Vec<u32> = text.chars().filter_map(alphanumeric_value).collect();
        let mut payload = BitBuffer::new();
        for pair in values.chunks(2) {
            match *pair {
                [a, b] => payload.put_bits(a * 45 + b, 11),
                [a] => payload.put_bits(a, 6),
                _ => {}
            }
        }
        Self {
            mode: Mode::Alphanumeric,
            char_count: values.len(),
            payload,
        }
    }

    fn kanji(text: &str) -> Option<Self> {
        let (sjis, _, had_errors) = SHIFT_JIS.encode(text);
        let char_count = text.chars().count();
        if had_errors || sjis.len() != char_count * 2 {
            return None;
        }
        let mut payload = BitBuffer::new();
        for pair in sjis.chunks_exact(2) {
            let code = u16::from_be_bytes([pair[0], pair[1]]);
            payload.put_bits(kanji_value(code)?, 13);
        }
        Some(Self {
            mode: Mode::Kanji,
            char_count,
            payload,
        })
    }

    fn bytes(data: &[u8]) -> Self {
        let mut payload = BitBuffer::new();
        for &b in data {
            payload.put_bits(b as u32, 8);
        }
        Self {
            mode: Mode::Byte,
            char_count: data.len(),
            payload,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Header plus payload bits at `version`
    pub fn bit_len(&self, version: Version) -> usize {
        4 + version.char_count_bits(self.mode) + self.payload.len()
    }

    /// Like [`Segment::bit_len`], but `None` when the count overflows its field
    pub fn total_bits(&self, version: Version) -> Option<usize> {
        let count_bits = version.char_count_bits(self.mode);
        (self.char_count < 1 << count_bits).then(|| self.bit_len(version))
    }

    /// Write mode indicator, character count and payload
    pub fn write(&self, version: Version, out: &mut BitBuffer) {
        out.put_bits(self.mode.indicator(), 4);
        out.put_bits(self.char_count as u32, version.char_count_bits(self.mode));
        out.append(&self.payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(Segment::from_text("12345").mode(), Mode::Numeric);
        assert_eq!(Segment::from_text("HELLO WORLD").mode(), Mode::Alphanumeric);
        assert_eq!(Segment::from_text("Hello").mode(), Mode::Byte);
        assert_eq!(Segment::from_text("\u{70b9}\u{8317}").mode(), Mode::Kanji);
        assert_eq!(Segment::from_text("caf\u{e9}").mode(), Mode::Byte);
        assert_eq!(Segment::from_text("").mode(), Mode::Byte);
    }

    #[test]
    fn test_numeric_bits() {
        // "01234567": 0000001100 0101011001 1000011
        let segment = Segment::from_text("01234567");
        let v1 = Version::MIN;
        assert_eq!(segment.total_bits(v1), Some(4 + 10 + 27));
        let mut out = BitBuffer::new();
        segment.write(v1, &mut out);
        assert_eq!(
            out.into_bytes(),
            vec![0x10, 0x20, 0x0C, 0x56, 0x61, 0x80]
        );
    }

    #[test]
    fn test_numeric_shorter_than_byte() {
        let v1 = Version::MIN;
        let numeric = Segment::from_text("12345").total_bits(v1).unwrap();
        let bytes = Segment::bytes(b"12345").total_bits(v1).unwrap();
        assert_eq!(numeric, 4 + 10 + 17);
        assert!(numeric < bytes);
    }

    #[test]
    fn test_alphanumeric_bits() {
        let segment = Segment::from_text("AC-42");
        assert_eq!(segment.char_count(), 5);
        assert_eq!(segment.total_bits(Version::MIN), Some(4 + 9 + 11 * 2 + 6));
    }

    #[test]
    fn test_utf8_byte_count() {
        let segment = Segment::from_text("\u{e9}t\u{e9}");
        assert_eq!(segment.char_count(), 5);
    }

    #[test]
    fn test_count_overflow() {
        let long = "1".repeat(1024);
        assert_eq!(Segment::from_text(&long).total_bits(Version::MIN), None);
        assert!(Segment::from_text(&long).total_bits(Version::new(10).unwrap()).is_some());
    }
}
