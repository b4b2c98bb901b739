use crate::error::{QrError, Result};

/// Compact bit matrix for storing binary data
///
/// `true` is a dark module (or a black pixel after binarization).
/// Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions, all bits cleared
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create a square matrix
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a matrix from rows of booleans. All rows must share one length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut matrix = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(QrError::InvalidInput(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            for (x, &bit) in row.iter().enumerate() {
                matrix.set(x, y, bit);
            }
        }
        Ok(matrix)
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> (usize, usize) {
        let index = y * self.width + x;
        (index / 8, index % 8)
    }

    #[inline]
    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> QrError {
        QrError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Get bit at (x, y)
    ///
    /// # Panics
    /// Panics if (x, y) lies outside the matrix.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(
            self.in_bounds(x, y),
            "BitMatrix index ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        let (byte_index, bit_index) = self.index(x, y);
        (self.data[byte_index] >> bit_index) & 1 == 1
    }

    /// Get bit at (x, y), or `None` outside the matrix
    #[inline]
    pub fn try_get(&self, x: usize, y: usize) -> Option<bool> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let (byte_index, bit_index) = self.index(x, y);
        Some((self.data[byte_index] >> bit_index) & 1 == 1)
    }

    /// Get bit at signed image coordinates, treating everything outside as white
    #[inline]
    pub(crate) fn get_or_white(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.try_get(x as usize, y as usize).unwrap_or(false)
    }

    /// Set bit at (x, y)
    ///
    /// # Panics
    /// Panics if (x, y) lies outside the matrix.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if let Err(err) = self.try_set(x, y, value) {
            panic!("BitMatrix::set: {err}");
        }
    }

    /// Set bit at (x, y), failing with [`QrError::OutOfBounds`] outside the matrix
    pub fn try_set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let (byte_index, bit_index) = self.index(x, y);
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
        Ok(())
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        assert!(
            self.in_bounds(x, y),
            "BitMatrix index ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        let (byte_index, bit_index) = self.index(x, y);
        self.data[byte_index] ^= 1 << bit_index;
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Iterate the bits of row `y`, left to right
    pub fn row(&self, y: usize) -> impl Iterator<Item = bool> + '_ {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        (0..self.width).map(move |x| self.get(x, y))
    }

    /// Iterate the bits of column `x`, top to bottom
    pub fn column(&self, x: usize) -> impl Iterator<Item = bool> + '_ {
        assert!(x < self.width, "column {x} out of bounds for width {}", self.width);
        (0..self.height).map(move |y| self.get(x, y))
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Mirror across the main diagonal
    pub fn transpose(&self) -> BitMatrix {
        let mut out = BitMatrix::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(8, 8);
        assert_eq!(matrix.width(), 8);
        assert_eq!(matrix.height(), 8);

        matrix.set(3, 4, true);
        assert!(matrix.get(3, 4));
        assert!(!matrix.get(3, 3));

        matrix.toggle(3, 4);
        assert!(!matrix.get(3, 4));

        matrix.set(1, 1, true);
        matrix.clear();
        assert_eq!(matrix.count_ones(), 0);
    }

    #[test]
    fn test_checked_access() {
        let mut matrix = BitMatrix::new(8, 5);
        assert_eq!(matrix.try_get(8, 0), None);
        assert_eq!(matrix.try_get(7, 4), Some(false));
        assert_eq!(
            matrix.try_set(2, 5, true),
            Err(QrError::OutOfBounds {
                x: 2,
                y: 5,
                width: 8,
                height: 5
            })
        );
        assert!(!matrix.get_or_white(-1, 2));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        let matrix = BitMatrix::new(8, 8);
        matrix.get(10, 10);
    }

    #[test]
    fn test_row_and_column() {
        let matrix = BitMatrix::from_rows(&[
            [true, false, false],
            [true, true, false],
        ])
        .unwrap();
        assert_eq!(matrix.row(1).collect::<Vec<_>>(), vec![true, true, false]);
        assert_eq!(matrix.column(0).collect::<Vec<_>>(), vec![true, true]);
        assert_eq!(matrix.column(2).filter(|&b| b).count(), 0);
    }

    #[test]
    fn test_transpose() {
        let mut matrix = BitMatrix::new(3, 2);
        matrix.set(2, 1, true);
        let t = matrix.transpose();
        assert_eq!((t.width(), t.height()), (2, 3));
        assert!(t.get(1, 2));
        assert_eq!(t.transpose(), matrix);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: Vec<Vec<bool>> = vec![vec![true, false], vec![true]];
        assert!(BitMatrix::from_rows(&rows).is_err());
    }
}
