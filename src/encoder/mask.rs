use crate::models::{BitMatrix, ECLevel, MaskPattern};
use crate::symbol::FunctionMask;
use crate::symbol::format::write_format_info;
use crate::symbol::placement::apply_mask;
use rayon::prelude::*;

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// Mask the symbol with every pattern, write format info and keep the lowest penalty.
/// Ties go to the lowest pattern index.
pub(crate) fn select_mask(
    unmasked: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
) -> (MaskPattern, BitMatrix, u32) {
    let mut candidates: Vec<(BitMatrix, u32)> = MaskPattern::ALL
        .par_iter()
        .map(|&mask| {
            let masked = masked_symbol(unmasked, func, ec_level, mask);
            let score = penalty(&masked);
            (masked, score)
        })
        .collect();
    let best = (1..candidates.len()).fold(0, |best, i| {
        if candidates[i].1 < candidates[best].1 { i } else { best }
    });
    let (masked, score) = candidates.swap_remove(best);
    (MaskPattern::ALL[best], masked, score)
}

pub(crate) fn masked_symbol(
    unmasked: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
    mask: MaskPattern,
) -> BitMatrix {
    let mut masked = unmasked.clone();
    apply_mask(&mut masked, mask, func);
    write_format_info(&mut masked, ec_level, mask);
    masked
}

/// Total of the four penalty rules over a square symbol
pub fn penalty(matrix: &BitMatrix) -> u32 {
    let size = matrix.width();
    let rows: Vec<Vec<bool>> = (0..size).map(|y| matrix.row(y).collect()).collect();
    let columns: Vec<Vec<bool>> = (0..size).map(|x| matrix.column(x).collect()).collect();

    let n1: u32 = rows.iter().chain(&columns).map(|line| run_penalty(line)).sum();
    let n3: u32 = rows.iter().chain(&columns).map(|line| finder_like_penalty(line)).sum();
    n1 + block_penalty(&rows) + n3 + balance_penalty(matrix)
}

/// Rule 1: runs of five or more same-coloured modules
fn run_penalty(line: &[bool]) -> u32 {
    let mut total = 0;
    let mut run = 0u32;
    let mut previous = None;
    for &module in line {
        if Some(module) == previous {
            run += 1;
        } else {
            if run >= 5 {
                total += N1 + run - 5;
            }
            run = 1;
            previous = Some(module);
        }
    }
    if run >= 5 {
        total += N1 + run - 5;
    }
    total
}

/// Rule 2: 2x2 blocks of one colour
fn block_penalty(rows: &[Vec<bool>]) -> u32 {
    rows.windows(2)
        .map(|pair| {
            (0..pair[0].len().saturating_sub(1))
                .filter(|&x| {
                    let c = pair[0][x];
                    pair[0][x + 1] == c && pair[1][x] == c && pair[1][x + 1] == c
                })
                .count() as u32
                * N2
        })
        .sum()
}

/// Rule 3: dark-light-dark(3)-light-dark with four light modules on either side.
/// Modules outside the symbol count as light.
fn finder_like_penalty(line: &[bool]) -> u32 {
    const CORE: [bool; 7] = [true, false, true, true, true, false, true];
    let light = |from: isize, to: isize| {
        (from..to).all(|i| i < 0 || i as usize >= line.len() || !line[i as usize])
    };
    line.windows(7)
        .enumerate()
        .filter(|(i, window)| {
            let start = *i as isize;
            *window == CORE && (light(start - 4, start) || light(start + 7, start + 11))
        })
        .count() as u32
        * N3
}

/// Rule 4: every 5% the dark ratio strays from 50%
fn balance_penalty(matrix: &BitMatrix) -> u32 {
    let total = (matrix.width() * matrix.height()) as u32;
    let dark = matrix.count_ones() as u32;
    let deviation = (dark * 2).abs_diff(total) * 10 / total;
    deviation * N4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_penalty() {
        assert_eq!(run_penalty(&[true; 4]), 0);
        assert_eq!(run_penalty(&[true; 5]), 3);
        assert_eq!(run_penalty(&[false; 7]), 5);
        let mixed = [true, true, true, true, true, false, true, true, true, true, true, true];
        assert_eq!(run_penalty(&mixed), 3 + 4);
    }

    #[test]
    fn test_block_penalty() {
        let rows = vec![vec![true, true, true], vec![true, true, false]];
        assert_eq!(block_penalty(&rows), 3);
    }

    #[test]
    fn test_finder_like_penalty() {
        let mut line = vec![false; 4];
        line.extend([true, false, true, true, true, false, true]);
        assert_eq!(finder_like_penalty(&line), 40);
        // Pattern flush against the edge still has light space outside the symbol
        let edge = [true, false, true, true, true, false, true, true, true, true, true];
        assert_eq!(finder_like_penalty(&edge), 40);
        let enclosed = [true, true, false, true, true, true, false, true, true];
        assert_eq!(finder_like_penalty(&enclosed), 0);
    }

    #[test]
    fn test_balance_penalty() {
        let mut matrix = BitMatrix::square(10);
        assert_eq!(balance_penalty(&matrix), 100);
        for i in 0..50 {
            matrix.set(i % 10, i / 10, true);
        }
        assert_eq!(balance_penalty(&matrix), 0);
        matrix.set(0, 9, true);
        matrix.set(1, 9, true);
        matrix.set(2, 9, true);
        matrix.set(3, 9, true);
        matrix.set(4, 9, true);
        matrix.set(5, 9, true);
        // 56% dark
        assert_eq!(balance_penalty(&matrix), 10);
    }
}
