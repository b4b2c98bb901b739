use super::Point;
use std::fmt;
use std::str::FromStr;

/// QR Code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version (21x21 modules)
    pub const MIN: Version = Version(1);
    /// Largest version (177x177 modules)
    pub const MAX: Version = Version(40);

    /// Create a version, `None` outside 1-40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version whose symbol is `dimension` modules wide
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        if dimension < 21 || (dimension - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((dimension - 17) / 4).ok().and_then(Self::new)
    }

    /// All versions in ascending order
    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40u8).map(Version)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// Number of modules available for codewords (data + EC + remainder bits)
    pub fn raw_data_modules(&self) -> usize {
        let ver = self.0 as usize;
        let mut result = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let num_align = ver / 7 + 2;
            result -= (25 * num_align - 10) * num_align - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    /// Total codewords (data + EC) in the symbol
    pub fn total_codewords(&self) -> usize {
        self.raw_data_modules() / 8
    }

    /// Character count field width for a segment mode (three version ranges)
    pub fn char_count_bits(&self, mode: Mode) -> usize {
        let range = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let widths: [usize; 3] = match mode {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji => [8, 10, 12],
        };
        widths[range]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    #[default]
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// All levels from lowest to highest redundancy
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Get error correction level from format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Two-bit value written into the format information
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the EC block tables
    pub(crate) fn ordinal(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

impl FromStr for ECLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ECLevel::L),
            "M" => Ok(ECLevel::M),
            "Q" => Ok(ECLevel::Q),
            "H" => Ok(ECLevel::H),
            other => Err(format!("unknown error correction level '{other}'")),
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// All eight patterns in index order
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Get mask pattern from bits
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    /// Three-bit value written into the format information
    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Check if module at row `i`, column `j` should be inverted
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Segment encoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Digits 0-9, three per 10 bits
    Numeric,
    /// 0-9, A-Z, space and $%*+-./:, two per 11 bits
    Alphanumeric,
    /// Arbitrary 8-bit bytes
    Byte,
    /// Shift JIS double-byte characters, one per 13 bits
    Kanji,
}

impl Mode {
    /// Four-bit mode indicator
    pub fn indicator(&self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
            Mode::Kanji => 0b1000,
        }
    }

    /// Mode for a four-bit indicator, `None` for ECI/terminator/unsupported
    pub fn from_indicator(bits: u32) -> Option<Self> {
        match bits {
            0b0001 => Some(Mode::Numeric),
            0b0010 => Some(Mode::Alphanumeric),
            0b0100 => Some(Mode::Byte),
            0b1000 => Some(Mode::Kanji),
            _ => None,
        }
    }
}

/// Decoded QR code
#[derive(Debug, Clone, PartialEq)]
pub struct QRCode {
    /// Raw payload bytes after error correction, concatenated across segments
    pub data: Vec<u8>,
    /// Decoded content as text
    pub content: String,
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub error_correction: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Corners in image coordinates: top-left, top-right, bottom-right, bottom-left.
    /// All zero when decoded straight from a module matrix.
    pub position: [Point; 4],
    /// Symbol was read as a mirror image
    pub mirrored: bool,
}

impl QRCode {
    /// Create a new QR code with decoded data
    pub fn new(
        data: Vec<u8>,
        content: String,
        version: Version,
        error_correction: ECLevel,
        mask_pattern: MaskPattern,
    ) -> Self {
        Self {
            data,
            content,
            version,
            error_correction,
            mask_pattern,
            position: [Point::default(); 4],
            mirrored: false,
        }
    }
}
