use crate::models::{BitMatrix, Version};
use crate::symbol::placement::data_positions;
use crate::symbol::{FunctionMask, alignment_centers};
use crate::symbol::version::write_version_info;

/// Unmasked symbol: function patterns drawn and codewords placed
pub(crate) struct SymbolBuilder {
    pub(crate) modules: BitMatrix,
    pub(crate) func: FunctionMask,
}

impl SymbolBuilder {
    pub(crate) fn new(version: Version) -> Self {
        let size = version.size();
        let mut modules = BitMatrix::square(size);

        for (x, y) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            draw_square(&mut modules, x, y, 3, |ring| ring != 2);
        }
        for i in 8..size - 8 {
            modules.set(6, i, i % 2 == 0);
            modules.set(i, 6, i % 2 == 0);
        }
        for (x, y) in alignment_centers(version) {
            draw_square(&mut modules, x, y, 2, |ring| ring != 1);
        }
        write_version_info(&mut modules, version);

        Self {
            modules,
            func: FunctionMask::new(version),
        }
    }

    /// Write codewords MSB first in placement order; leftover remainder bits stay light
    pub(crate) fn place_codewords(&mut self, codewords: &[u8]) {
        for (i, (x, y)) in data_positions(&self.func).into_iter().enumerate() {
            let dark = codewords
                .get(i / 8)
                .is_some_and(|byte| (byte >> (7 - i % 8)) & 1 == 1);
            self.modules.set(x, y, dark);
        }
    }
}

/// Concentric square around (cx, cy); `dark(ring)` picks the colour per Chebyshev distance
fn draw_square(
    modules: &mut BitMatrix,
    cx: usize,
    cy: usize,
    radius: usize,
    dark: impl Fn(usize) -> bool,
) {
    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            let ring = x.abs_diff(cx).max(y.abs_diff(cy));
            modules.set(x, y, dark(ring));
        }
    }
}
