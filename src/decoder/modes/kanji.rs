use crate::decoder::bitstream::BitReader;
use crate::error::{QrError, Result};

/// Kanji mode decoder (Mode 1000)
/// Each character is a 13-bit compaction of a two-byte Shift JIS code.
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Read `character_count` characters, returning their Shift JIS bytes
    pub fn decode(reader: &mut BitReader<'_>, character_count: usize) -> Result<Vec<u8>> {
        let mut sjis = Vec::with_capacity(character_count * 2);
        for _ in 0..character_count {
            let value = reader
                .read(13)
                .ok_or(QrError::MalformedData("truncated kanji segment"))?;
            let mut code = ((value / 0xC0) << 8) | (value % 0xC0);
            code += if code < 0x1F00 { 0x8140 } else { 0xC140 };
            sjis.push((code >> 8) as u8);
            sjis.push(code as u8);
        }
        Ok(sjis)
    }
}

/// 13-bit Kanji value for a two-byte Shift JIS code, `None` outside the Kanji ranges
pub fn kanji_value(code: u16) -> Option<u32> {
    let offset = match code {
        0x8140..=0x9FFC => code - 0x8140,
        0xE040..=0xEBBF => code - 0xC140,
        _ => return None,
    };
    let low = (offset & 0xFF) as u32;
    if low >= 0xC0 {
        return None;
    }
    Some((offset >> 8) as u32 * 0xC0 + low)
}
