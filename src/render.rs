//! Module grid to raster image.

use crate::models::BitMatrix;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Dark-module colour presets
pub struct QrColor;

impl QrColor {
    /// `#000000`
    pub const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
    /// `#0000FF`
    pub const BLUE: Rgb<u8> = Rgb([0x00, 0x00, 0xFF]);
    /// `#FF0000`
    pub const RED: Rgb<u8> = Rgb([0xFF, 0x00, 0x00]);
    /// `#006400`
    pub const DARK_GREEN: Rgb<u8> = Rgb([0x00, 0x64, 0x00]);
    /// `#FFFFFF`
    pub const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

    /// Preset by name (`black`, `blue`, `red`, `dark-green`) or `#RRGGBB`
    pub fn parse(name: &str) -> Option<Rgb<u8>> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "black" => Some(Self::BLACK),
            "blue" => Some(Self::BLUE),
            "red" => Some(Self::RED),
            "dark-green" | "darkgreen" | "dark_green" => Some(Self::DARK_GREEN),
            "white" => Some(Self::WHITE),
            hex => {
                let hex = hex.strip_prefix('#')?;
                if hex.len() != 6 {
                    return None;
                }
                let value = u32::from_str_radix(hex, 16).ok()?;
                Some(Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
            }
        }
    }
}

/// Rendering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    /// Pixels per module
    pub scale: u32,
    /// Light border in modules on every side
    pub quiet_zone: u32,
    /// Dark module colour
    pub dark: Rgb<u8>,
    /// Light module and quiet zone colour
    pub light: Rgb<u8>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            scale: 8,
            quiet_zone: 4,
            dark: QrColor::BLACK,
            light: QrColor::WHITE,
        }
    }
}

impl Renderer {
    /// Default settings with the given dark colour
    pub fn with_color(dark: Rgb<u8>) -> Self {
        Self {
            dark,
            ..Self::default()
        }
    }

    /// Side length in pixels of a rendered `matrix`
    pub fn image_size(&self, matrix: &BitMatrix) -> (u32, u32) {
        let border = 2 * self.quiet_zone;
        let scale = self.scale.max(1);
        (
            (matrix.width() as u32 + border) * scale,
            (matrix.height() as u32 + border) * scale,
        )
    }

    fn is_dark(&self, matrix: &BitMatrix, px: u32, py: u32, scale: u32, offset: u32) -> bool {
        if px < offset || py < offset {
            return false;
        }
        let mx = ((px - offset) / scale).checked_sub(self.quiet_zone);
        let my = ((py - offset) / scale).checked_sub(self.quiet_zone);
        match (mx, my) {
            (Some(mx), Some(my)) => matrix.try_get(mx as usize, my as usize).unwrap_or(false),
            _ => false,
        }
    }

    /// Render with `scale` pixels per module
    pub fn to_rgb(&self, matrix: &BitMatrix) -> RgbImage {
        let (width, height) = self.image_size(matrix);
        let scale = self.scale.max(1);
        RgbImage::from_fn(width, height, |x, y| {
            if self.is_dark(matrix, x, y, scale, 0) {
                self.dark
            } else {
                self.light
            }
        })
    }

    /// Render as 8-bit luminance, dark modules 0 and light modules 255
    pub fn to_luma(&self, matrix: &BitMatrix) -> GrayImage {
        let (width, height) = self.image_size(matrix);
        let scale = self.scale.max(1);
        GrayImage::from_fn(width, height, |x, y| {
            Luma([if self.is_dark(matrix, x, y, scale, 0) { 0 } else { 255 }])
        })
    }

    /// Render into a `side` x `side` square with the largest integer scale
    /// that fits, centred. Grows past `side` when even one pixel per module
    /// does not fit. `self.scale` is ignored.
    pub fn fit_rgb(&self, matrix: &BitMatrix, side: u32) -> RgbImage {
        let modules = matrix.width().max(matrix.height()) as u32 + 2 * self.quiet_zone;
        let scale = (side / modules.max(1)).max(1);
        let out = side.max(modules * scale);
        let offset = (out - modules * scale) / 2;
        RgbImage::from_fn(out, out, |x, y| {
            if self.is_dark(matrix, x, y, scale, offset) {
                self.dark
            } else {
                self.light
            }
        })
    }
}
