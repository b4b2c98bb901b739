use super::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Data module coordinates `(x, y)` in codeword bit order.
///
/// Two-column strips are walked right to left, skipping the vertical timing
/// column, alternating upward and downward; within a strip the right column
/// comes first.
pub fn data_positions(func: &FunctionMask) -> Vec<(usize, usize)> {
    let size = func.size();
    let mut positions = Vec::with_capacity(func.data_modules_count());
    let mut upward = true;
    let mut col = size as isize - 1;

    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }
        for step in 0..size {
            let row = if upward { size - 1 - step } else { step };
            for x in [col as usize, col as usize - 1] {
                if !func.is_function(x, row) {
                    positions.push((x, row));
                }
            }
        }
        upward = !upward;
        col -= 2;
    }

    positions
}

/// XOR every data module with the mask pattern. Applying it twice restores the matrix.
pub fn apply_mask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = func.size();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Version;
    use std::collections::HashSet;

    #[test]
    fn test_zigzag_start() {
        let func = FunctionMask::new(Version::MIN);
        let positions = data_positions(&func);
        assert_eq!(positions.len(), 208);
        assert_eq!(&positions[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
        // After the first strip reaches the top it turns down the next one
        assert_eq!(positions[24], (18, 9));
    }

    #[test]
    fn test_positions_are_unique_data_modules() {
        let func = FunctionMask::new(Version::new(8).unwrap());
        let positions = data_positions(&func);
        let unique: HashSet<_> = positions.iter().copied().collect();
        assert_eq!(unique.len(), positions.len());
        assert_eq!(positions.len(), func.data_modules_count());
        assert!(positions.iter().all(|&(x, _)| x != 6));
    }

    #[test]
    fn test_apply_mask_is_involution() {
        let func = FunctionMask::new(Version::MIN);
        let mut matrix = BitMatrix::square(21);
        matrix.set(10, 10, true);
        let original = matrix.clone();

        apply_mask(&mut matrix, MaskPattern::Pattern0, &func);
        // (10,10): (10+10)%2 == 0 so the module flipped
        assert!(!matrix.get(10, 10));
        // Function modules untouched
        assert!(!matrix.get(0, 0));

        apply_mask(&mut matrix, MaskPattern::Pattern0, &func);
        assert_eq!(matrix, original);
    }
}
