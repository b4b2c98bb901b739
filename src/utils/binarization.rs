//! Grayscale to black/white conversion. In every result true = black.

use crate::models::BitMatrix;

const BLOCK_SIZE_POWER: usize = 3;
const BLOCK_SIZE: usize = 1 << BLOCK_SIZE_POWER;
/// Blocks whose max - min is at most this are treated as flat
const MIN_DYNAMIC_RANGE: u32 = 24;
/// Below this many pixels on either side the global threshold is used
const MINIMUM_DIMENSION: usize = BLOCK_SIZE * 5;

/// Binarize with block-local thresholds.
///
/// The image is split into 8x8 blocks. Each block gets a black point: its
/// mean, or for a flat block half its minimum (raised to the neighbours'
/// estimate when that is higher than the minimum). Every pixel is compared
/// with the average black point of the 5x5 blocks around its own block.
/// Images smaller than 40 pixels in either dimension use [`otsu_binarize`].
pub fn hybrid_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    if width < MINIMUM_DIMENSION || height < MINIMUM_DIMENSION {
        return otsu_binarize(gray, width, height);
    }
    let sub_width = width.div_ceil(BLOCK_SIZE);
    let sub_height = height.div_ceil(BLOCK_SIZE);
    let black_points = calculate_black_points(gray, sub_width, sub_height, width, height);

    let mut binary = BitMatrix::new(width, height);
    let max_x_offset = width - BLOCK_SIZE;
    let max_y_offset = height - BLOCK_SIZE;
    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        let top = y.clamp(2, sub_height - 3);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);
            let left = x.clamp(2, sub_width - 3);
            let sum: u32 = (top - 2..=top + 2)
                .flat_map(|by| (left - 2..=left + 2).map(move |bx| (bx, by)))
                .map(|(bx, by)| black_points[by * sub_width + bx])
                .sum();
            let threshold = sum / 25;
            for yy in y_offset..y_offset + BLOCK_SIZE {
                let row = &gray[yy * width..];
                for xx in x_offset..x_offset + BLOCK_SIZE {
                    if (row[xx] as u32) < threshold {
                        binary.set(xx, yy, true);
                    }
                }
            }
        }
    }
    binary
}

fn calculate_black_points(
    gray: &[u8],
    sub_width: usize,
    sub_height: usize,
    width: usize,
    height: usize,
) -> Vec<u32> {
    let max_x_offset = width - BLOCK_SIZE;
    let max_y_offset = height - BLOCK_SIZE;
    let mut black_points = vec![0u32; sub_width * sub_height];
    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);
            let mut sum = 0u32;
            let mut min = u32::MAX;
            let mut max = 0u32;
            for yy in y_offset..y_offset + BLOCK_SIZE {
                for &pixel in &gray[yy * width + x_offset..yy * width + x_offset + BLOCK_SIZE] {
                    let pixel = pixel as u32;
                    sum += pixel;
                    min = min.min(pixel);
                    max = max.max(pixel);
                }
            }

            let mut average = sum >> (2 * BLOCK_SIZE_POWER);
            if max - min <= MIN_DYNAMIC_RANGE {
                // Flat block: assume background unless the neighbours say otherwise
                average = min / 2;
                if y > 0 && x > 0 {
                    let neighbour = (black_points[(y - 1) * sub_width + x]
                        + 2 * black_points[y * sub_width + x - 1]
                        + black_points[(y - 1) * sub_width + x - 1])
                        / 4;
                    if min < neighbour {
                        average = neighbour;
                    }
                }
            }
            black_points[y * sub_width + x] = average;
        }
    }
    black_points
}

/// Convert grayscale image to binary using Otsu's thresholding method
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let threshold = calculate_otsu_threshold(&gray[..width * height]);
    threshold_binarize(gray, width, height, threshold)
}

/// Calculate Otsu's optimal threshold. Returns 0 (nothing black) when
/// the histogram has a single populated level.
fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: u64 = histogram.iter().enumerate().map(|(i, &c)| i as u64 * c).sum();
    let mut max_variance = 0.0;
    let mut optimal_threshold = 0u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    // Pixels strictly below `threshold` form the dark class
    for threshold in 1..=255u8 {
        let below = threshold as usize - 1;
        class1_pixels += histogram[below];
        class1_sum += below as u64 * histogram[below];
        let class2_pixels = gray.len() as u64 - class1_pixels;
        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) as f64 / class2_pixels as f64;
        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;
        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization: pixels below `threshold` are black
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    for (y, row) in gray.chunks_exact(width.max(1)).take(height).enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            if pixel < threshold {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 50]; // 2x2 image
        let binary = threshold_binarize(&gray, 2, 2, 128);

        assert!(binary.get(0, 0)); // 100 < 128
        assert!(!binary.get(1, 0)); // 150 >= 128
        assert!(!binary.get(0, 1)); // 200 >= 128
        assert!(binary.get(1, 1)); // 50 < 128
    }

    #[test]
    fn test_otsu_binarize() {
        let mut gray = vec![50u8; 50]; // Dark class
        gray.extend(vec![200u8; 50]); // Light class

        let binary = otsu_binarize(&gray, 10, 10);

        assert!(binary.get(0, 0));
        assert!(!binary.get(0, 7));
    }

    #[test]
    fn test_hybrid_uniform_is_white() {
        for level in [0u8, 128, 255] {
            let gray = vec![level; 64 * 48];
            let binary = hybrid_binarize(&gray, 64, 48);
            assert_eq!(binary.count_ones(), 0, "level {level}");
        }
    }

    #[test]
    fn test_hybrid_uneven_lighting() {
        // Vertical bars 4px wide whose brightness ramps across the image,
        // so no single global threshold separates them
        let (width, height) = (96, 64);
        let gray: Vec<u8> = (0..width * height)
            .map(|i| {
                let x = i % width;
                let base = 40 + (x * 150 / width) as u32;
                let dark = (x / 4) % 2 == 0;
                (if dark { base } else { base + 60 }).min(255) as u8
            })
            .collect();
        let binary = hybrid_binarize(&gray, width, height);
        for x in 0..width {
            assert_eq!(binary.get(x, 30), (x / 4) % 2 == 0, "x = {x}");
        }
    }

    #[test]
    fn test_hybrid_small_image_uses_otsu() {
        let mut gray = vec![30u8; 16 * 8];
        gray.extend(vec![220u8; 16 * 8]);
        let binary = hybrid_binarize(&gray, 16, 16);
        assert!(binary.get(3, 2));
        assert!(!binary.get(3, 12));
    }
}
