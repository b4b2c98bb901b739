//! Format information: EC level and mask pattern, written twice around the finders.

use crate::ec::BchCode;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Module coordinates of bit `i` (LSB first) of the copy wrapped around the top-left finder
fn first_copy(i: usize) -> (usize, usize) {
    match i {
        0..=5 => (8, i),
        6 => (8, 7),
        7 => (8, 8),
        8 => (7, 8),
        _ => (14 - i, 8),
    }
}

/// Coordinates of bit `i` of the copy split between the other two finders
fn second_copy(i: usize, size: usize) -> (usize, usize) {
    if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    }
}

/// Write both format copies and the dark module
pub fn write_format_info(matrix: &mut BitMatrix, ec_level: ECLevel, mask: MaskPattern) {
    let size = matrix.width();
    let word = BchCode::encode_format(ec_level, mask);
    for i in 0..15 {
        let bit = (word >> i) & 1 == 1;
        let (x, y) = first_copy(i);
        matrix.set(x, y, bit);
        let (x, y) = second_copy(i, size);
        matrix.set(x, y, bit);
    }
    matrix.set(8, size - 8, true);
}

fn read_word(matrix: &BitMatrix, position: impl Fn(usize) -> (usize, usize)) -> u16 {
    (0..15).fold(0u16, |word, i| {
        let (x, y) = position(i);
        word | (u16::from(matrix.get(x, y)) << i)
    })
}

/// Both raw 15-bit format words as read, top-left copy first
pub fn read_format_words(matrix: &BitMatrix) -> (u16, u16) {
    let size = matrix.width();
    (
        read_word(matrix, first_copy),
        read_word(matrix, |i| second_copy(i, size)),
    )
}

/// Decode the format information from whichever copy lies closest to a valid word
pub fn read_format_info(matrix: &BitMatrix) -> Option<(ECLevel, MaskPattern)> {
    let (first, second) = read_format_words(matrix);
    BchCode::decode_format_reads(&[first, second])
}
