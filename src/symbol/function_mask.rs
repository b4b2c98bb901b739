use crate::models::{BitMatrix, Version};

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // Finder patterns with separators, format info and the dark module
        Self::mark_rect(&mut mask, 0, 0, 9, 9);
        Self::mark_rect(&mut mask, size - 8, 0, 8, 9);
        Self::mark_rect(&mut mask, 0, size - 8, 9, 8);

        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            Self::mark_rect(&mut mask, cx - 2, cy - 2, 5, 5);
        }

        if version.number() >= 7 {
            Self::mark_rect(&mut mask, size - 11, 0, 3, 6);
            Self::mark_rect(&mut mask, 0, size - 11, 6, 3);
        }

        Self { mask, version }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    pub fn data_modules_count(&self) -> usize {
        self.size() * self.size() - self.mask.count_ones()
    }

    fn mark_rect(mask: &mut BitMatrix, x: usize, y: usize, width: usize, height: usize) {
        for yy in y..y + height {
            for xx in x..x + width {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern center coordinates along one axis, ascending.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let ver = version.number() as usize;
    if ver == 1 {
        return Vec::new();
    }
    let num_align = ver / 7 + 2;
    let step = (ver * 8 + num_align * 3 + 5) / (num_align * 4 - 4) * 2;
    let mut positions: Vec<usize> = (0..num_align - 1)
        .map(|i| version.size() - 7 - i * step)
        .collect();
    positions.push(6);
    positions.reverse();
    positions
}

/// Alignment pattern centers as (x, y), skipping the three finder corners.
pub fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &y) in positions.iter().enumerate() {
        for (j, &x) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((x, y));
            }
        }
    }
    centers
}
