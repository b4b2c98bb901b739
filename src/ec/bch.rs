use crate::models::{ECLevel, MaskPattern, Version};

/// BCH(15,5) generator for format information
const FORMAT_GENERATOR: u32 = 0x537;
/// XOR applied to format information so it is never all zero
const FORMAT_MASK: u16 = 0x5412;
/// BCH(18,6) generator for version information
const VERSION_GENERATOR: u32 = 0x1F25;
/// Largest Hamming distance accepted when snapping to a valid codeword
const MAX_DISTANCE: u32 = 3;

/// BCH codes protecting QR format and version information
pub struct BchCode;

impl BchCode {
    fn remainder(data: u32, data_bits: u32, generator: u32) -> u32 {
        let ec_bits = 31 - generator.leading_zeros();
        let mut rem = data << ec_bits;
        for shift in (0..data_bits).rev() {
            if rem & (1 << (shift + ec_bits)) != 0 {
                rem ^= generator << shift;
            }
        }
        rem
    }

    /// 15-bit masked format word for an EC level and mask
    pub fn encode_format(ec_level: ECLevel, mask: MaskPattern) -> u16 {
        let data = ((ec_level.format_bits() as u32) << 3) | mask.bits() as u32;
        let word = (data << 10) | Self::remainder(data, 5, FORMAT_GENERATOR);
        word as u16 ^ FORMAT_MASK
    }

    /// Snap a raw 15-bit read to the nearest valid format word
    pub fn decode_format(bits: u16) -> Option<(ECLevel, MaskPattern)> {
        Self::decode_format_reads(&[bits])
    }

    /// Nearest valid format word over several reads of the same symbol;
    /// the smallest distance across all reads wins
    pub fn decode_format_reads(reads: &[u16]) -> Option<(ECLevel, MaskPattern)> {
        let (data, distance) = (0u8..32)
            .map(|data| {
                let ec_level = ECLevel::from_format_bits(data >> 3);
                let word = Self::encode_format(ec_level, MaskPattern::from_bits(data));
                let distance = reads.iter().map(|&bits| (word ^ bits).count_ones()).min();
                (data, distance.unwrap_or(u32::MAX))
            })
            .min_by_key(|&(_, distance)| distance)?;
        (distance <= MAX_DISTANCE).then(|| {
            (
                ECLevel::from_format_bits(data >> 3),
                MaskPattern::from_bits(data),
            )
        })
    }

    /// 18-bit version word (versions 7 and up carry one)
    pub fn encode_version(version: Version) -> u32 {
        let data = version.number() as u32;
        (data << 12) | Self::remainder(data, 6, VERSION_GENERATOR)
    }

    /// Snap a raw 18-bit read to the nearest valid version word
    pub fn decode_version(bits: u32) -> Option<Version> {
        let (version, distance) = Version::all()
            .filter(|v| v.number() >= 7)
            .map(|v| (v, (Self::encode_version(v) ^ bits).count_ones()))
            .min_by_key(|&(_, distance)| distance)?;
        (distance <= MAX_DISTANCE).then_some(version)
    }
}
