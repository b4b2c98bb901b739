use super::*;
use crate::models::{ECLevel, MaskPattern};

/// Parse a grid drawn with `#` for dark and `.` for light
fn grid(rows: &[&str]) -> BitMatrix {
    let rows: Vec<Vec<bool>> = rows
        .iter()
        .map(|r| r.chars().map(|c| c == '#').collect())
        .collect();
    BitMatrix::from_rows(&rows).unwrap()
}

/// Version 1-M, mask 7, numeric "4376471154038" (made by an independent generator)
fn golden() -> BitMatrix {
    grid(&[
        "#######.....#.#######",
        "#.....#..#....#.....#",
        "#.###.#...##..#.###.#",
        "#.###.#...#...#.###.#",
        "#.###.#..####.#.###.#",
        "#.....#.#.#...#.....#",
        "#######.#.#.#.#######",
        ".........#...........",
        "#..#.##.######.#.....",
        "###.#..##..#.#.#.##..",
        "#..#.####.##..###...#",
        "..#.#..#....#####....",
        "..#...##.#.#.###.##..",
        "........#.#..####.##.",
        "#######...###.#.####.",
        "#.....#.#.....##....#",
        "#.###.#..##.###..#.##",
        "#.###.#.#.#..####..##",
        "#.###.#..###.###.#..#",
        "#.....#..####..##..#.",
        "#######.###..#.###...",
    ])
}

#[test]
fn test_golden_matrix_decode() {
    let qr = QrDecoder::decode_matrix(&golden()).unwrap();
    assert_eq!(qr.content, "4376471154038");
    assert_eq!(qr.data, b"4376471154038");
    assert_eq!(qr.version, Version::MIN);
    assert_eq!(qr.error_correction, ECLevel::M);
    assert_eq!(qr.mask_pattern, MaskPattern::Pattern7);
}

#[test]
fn test_golden_matrix_with_damage() {
    let mut matrix = golden();
    // A few data modules in the lower right
    for (x, y) in [(20, 20), (19, 19), (17, 12), (12, 16)] {
        matrix.toggle(x, y);
    }
    let qr = QrDecoder::decode_matrix(&matrix).unwrap();
    assert_eq!(qr.content, "4376471154038");
}

#[test]
fn test_blank_grid_has_no_format() {
    let matrix = BitMatrix::square(21);
    assert_eq!(
        QrDecoder::decode_matrix(&matrix),
        Err(QrError::FormatInfoError)
    );
}

#[test]
fn test_rejects_bad_dimensions() {
    assert!(matches!(
        QrDecoder::decode_matrix(&BitMatrix::square(22)),
        Err(QrError::InvalidInput(_))
    ));
    assert!(matches!(
        QrDecoder::decode_matrix(&BitMatrix::new(21, 25)),
        Err(QrError::InvalidInput(_))
    ));
}
