//! Version information blocks (versions 7 and up).

use crate::ec::BchCode;
use crate::models::{BitMatrix, Version};

/// Write both 6x3 version blocks. No-op below version 7.
pub fn write_version_info(matrix: &mut BitMatrix, version: Version) {
    if version.number() < 7 {
        return;
    }
    let size = matrix.width();
    let word = BchCode::encode_version(version);
    for i in 0..18 {
        let bit = (word >> i) & 1 == 1;
        let a = size - 11 + i % 3;
        let b = i / 3;
        matrix.set(a, b, bit);
        matrix.set(b, a, bit);
    }
}

/// Decode the version blocks of a matrix at least 45 modules wide.
///
/// The top-right block is tried first, then the bottom-left one.
pub fn read_version_info(matrix: &BitMatrix) -> Option<Version> {
    let size = matrix.width();
    if size < 45 {
        return None;
    }
    let (mut top_right, mut bottom_left) = (0u32, 0u32);
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        top_right |= u32::from(matrix.get(a, b)) << i;
        bottom_left |= u32::from(matrix.get(b, a)) << i;
    }
    BchCode::decode_version(top_right).or_else(|| BchCode::decode_version(bottom_left))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_round_trip() {
        let version = Version::new(12).unwrap();
        let mut matrix = BitMatrix::square(version.size());
        write_version_info(&mut matrix, version);
        assert_eq!(read_version_info(&matrix), Some(version));
    }

    #[test]
    fn test_damaged_block_falls_back() {
        let version = Version::new(7).unwrap();
        let mut matrix = BitMatrix::square(version.size());
        write_version_info(&mut matrix, version);
        let size = matrix.width();
        for y in 0..4 {
            matrix.toggle(size - 11, y);
        }
        assert_eq!(read_version_info(&matrix), Some(version));
    }

    #[test]
    fn test_small_versions_have_no_block() {
        let mut matrix = BitMatrix::square(41);
        write_version_info(&mut matrix, Version::new(6).unwrap());
        assert_eq!(matrix.count_ones(), 0);
        assert_eq!(read_version_info(&matrix), None);
    }
}
