//! Encode and decode options.

use crate::models::{ECLevel, MaskPattern, Version};

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Use exactly this version instead of the smallest that fits
    pub version: Option<Version>,
    /// Use this mask instead of the lowest-penalty one
    pub mask: Option<MaskPattern>,
}

impl EncodeOptions {
    /// Options with the given EC level and automatic version and mask
    pub fn new(ec_level: ECLevel) -> Self {
        Self {
            ec_level,
            ..Self::default()
        }
    }
}

/// Thresholding strategy applied before detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinarizerKind {
    /// Block-local thresholds, robust to uneven lighting
    #[default]
    Hybrid,
    /// Single global Otsu threshold
    Otsu,
}

/// Decoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Binarizer used on the luminance image
    pub binarizer: BinarizerKind,
    /// Retry the transposed grid when a located symbol fails to decode
    pub try_mirrored: bool,
    /// Finder candidates kept (strongest first) before grouping into triples
    pub max_finder_candidates: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            binarizer: BinarizerKind::Hybrid,
            try_mirrored: true,
            max_finder_candidates: 16,
        }
    }
}

impl DecodeOptions {
    /// Defaults overridden by `QR_BINARIZER` (`hybrid` or `otsu`),
    /// `QR_TRY_MIRRORED` (0 or 1) and `QR_MAX_FINDER_CANDIDATES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let binarizer = match std::env::var("QR_BINARIZER")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Ok("otsu") => BinarizerKind::Otsu,
            _ => defaults.binarizer,
        };
        Self {
            binarizer,
            try_mirrored: parse_env_bool_u8("QR_TRY_MIRRORED", defaults.try_mirrored),
            max_finder_candidates: parse_env_usize(
                "QR_MAX_FINDER_CANDIDATES",
                defaults.max_finder_candidates,
            )
            .clamp(3, 64),
        }
    }
}
