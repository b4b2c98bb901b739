/// RGB/RGBA to luminance
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Rows per parallel task
const ROWS_PER_TASK: usize = 16;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

fn to_grayscale(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    let chunk = width * ROWS_PER_TASK;
    gray.par_chunks_mut(chunk)
        .zip(pixels.par_chunks(chunk * channels))
        .for_each(|(out, input)| {
            for (dst, px) in out.iter_mut().zip(input.chunks_exact(channels)) {
                *dst = luma(px[0], px[1], px[2]);
            }
        });
    gray
}

/// Convert packed RGB (3 bytes per pixel) to luminance.
/// `rgb` must hold at least `width * height * 3` bytes.
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgb, width, height, 3)
}

/// Convert packed RGBA (4 bytes per pixel) to luminance, ignoring alpha
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgba, width, height, 4)
}
