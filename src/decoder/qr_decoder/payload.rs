use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{
    alphanumeric::AlphanumericDecoder, byte::ByteDecoder, kanji::KanjiDecoder,
    numeric::NumericDecoder,
};
use crate::error::{QrError, Result};
use crate::models::{Mode, Version};
use encoding_rs::SHIFT_JIS;
use tracing::trace;

const ECI_INDICATOR: u32 = 0b0111;

/// Character set selected by an ECI designator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    /// No designator: UTF-8 when valid, ISO-8859-1 otherwise
    Detect,
    Utf8,
    Latin1,
    ShiftJis,
}

impl Charset {
    fn from_eci(value: u32) -> Option<Self> {
        match value {
            1 | 3 => Some(Charset::Latin1),
            20 => Some(Charset::ShiftJis),
            26 => Some(Charset::Utf8),
            _ => None,
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Detect => Ok(match std::str::from_utf8(bytes) {
                Ok(s) => s.to_owned(),
                Err(_) => latin1(bytes),
            }),
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|_| QrError::MalformedData("invalid UTF-8 in byte segment")),
            Charset::Latin1 => Ok(latin1(bytes)),
            Charset::ShiftJis => shift_jis(bytes),
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn shift_jis(bytes: &[u8]) -> Result<String> {
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(QrError::MalformedData("invalid Shift JIS sequence"))
}

fn read_eci(reader: &mut BitReader<'_>) -> Result<u32> {
    let truncated = QrError::MalformedData("truncated ECI designator");
    let first = reader.read(8).ok_or(truncated.clone())?;
    if first & 0x80 == 0 {
        return Ok(first & 0x7F);
    }
    if first & 0xC0 == 0x80 {
        let second = reader.read(8).ok_or(truncated)?;
        return Ok(((first & 0x3F) << 8) | second);
    }
    if first & 0xE0 == 0xC0 {
        let rest = reader.read(16).ok_or(truncated)?;
        return Ok(((first & 0x1F) << 16) | rest);
    }
    Err(QrError::MalformedData("bad ECI designator"))
}

/// Parse the corrected data codewords into raw payload bytes and text.
///
/// Segments are read until a terminator or until fewer than four bits remain.
pub(crate) fn decode_payload(data_codewords: &[u8], version: Version) -> Result<(Vec<u8>, String)> {
    let mut reader = BitReader::new(data_codewords);
    let mut data = Vec::new();
    let mut content = String::new();
    let mut charset = Charset::Detect;

    while reader.available() >= 4 {
        let indicator = reader
            .read(4)
            .ok_or(QrError::MalformedData("truncated mode indicator"))?;
        if indicator == 0 {
            break;
        }
        if indicator == ECI_INDICATOR {
            let value = read_eci(&mut reader)?;
            trace!(eci = value, "ECI designator");
            charset = Charset::from_eci(value).unwrap_or(charset);
            continue;
        }

        let mode = Mode::from_indicator(indicator)
            .ok_or(QrError::MalformedData("unsupported mode indicator"))?;
        let count = reader
            .read(version.char_count_bits(mode))
            .ok_or(QrError::MalformedData("truncated character count"))?
            as usize;
        trace!(?mode, count, "segment");

        match mode {
            Mode::Numeric => {
                let text = NumericDecoder::decode(&mut reader, count)?;
                data.extend_from_slice(text.as_bytes());
                content.push_str(&text);
            }
            Mode::Alphanumeric => {
                let text = AlphanumericDecoder::decode(&mut reader, count)?;
                data.extend_from_slice(text.as_bytes());
                content.push_str(&text);
            }
            Mode::Byte => {
                let bytes = ByteDecoder::decode(&mut reader, count)?;
                content.push_str(&charset.decode(&bytes)?);
                data.extend_from_slice(&bytes);
            }
            Mode::Kanji => {
                let bytes = KanjiDecoder::decode(&mut reader, count)?;
                content.push_str(&shift_jis(&bytes)?);
                data.extend_from_slice(&bytes);
            }
        }
    }

    Ok((data, content))
}
