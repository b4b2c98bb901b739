use crate::models::{ECLevel, Version};

/// Block structure of one (version, EC level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Total number of blocks
    pub num_blocks: usize,
    /// Parity codewords in every block
    pub ecc_per_block: usize,
    /// Blocks carrying `short_data_len` data codewords; the rest carry one more
    pub num_short_blocks: usize,
    /// Data codewords in a short block
    pub short_data_len: usize,
}

impl BlockLayout {
    /// Data codewords in block `index`
    pub fn data_len(&self, index: usize) -> usize {
        self.short_data_len + usize::from(index >= self.num_short_blocks)
    }

    /// Data plus parity codewords in block `index`
    pub fn block_len(&self, index: usize) -> usize {
        self.data_len(index) + self.ecc_per_block
    }

    /// Sum of data codewords over all blocks
    pub fn total_data(&self) -> usize {
        self.short_data_len * self.num_blocks + (self.num_blocks - self.num_short_blocks)
    }
}

// Index: [ec_level][version], column 0 unused
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

impl Version {
    /// Block structure at the given EC level
    pub fn block_layout(&self, ec_level: ECLevel) -> BlockLayout {
        let idx = ec_level.ordinal();
        let ver = self.number() as usize;
        let ecc_per_block = ECC_CODEWORDS_PER_BLOCK[idx][ver] as usize;
        let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][ver] as usize;
        let total = self.total_codewords();
        let short_block_len = total / num_blocks;
        BlockLayout {
            num_blocks,
            ecc_per_block,
            num_short_blocks: num_blocks - total % num_blocks,
            short_data_len: short_block_len - ecc_per_block,
        }
    }

    /// Data codewords available at the given EC level
    pub fn data_codewords(&self, ec_level: ECLevel) -> usize {
        self.block_layout(ec_level).total_data()
    }
}
