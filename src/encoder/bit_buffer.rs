/// Append-only MSB-first bit buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    bit_count: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn put_bits(&mut self, value: u32, count: usize) {
        debug_assert!(count <= 32 && (count == 32 || value >> count == 0));
        for i in (0..count).rev() {
            if self.bit_count % 8 == 0 {
                self.data.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.data.len() - 1;
                self.data[last] |= 1 << (7 - self.bit_count % 8);
            }
            self.bit_count += 1;
        }
    }

    /// Append every bit of another buffer
    pub fn append(&mut self, other: &BitBuffer) {
        for i in 0..other.bit_count {
            let bit = (other.data[i / 8] >> (7 - i % 8)) & 1;
            self.put_bits(bit as u32, 1);
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Bytes with the final partial byte zero-padded
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
