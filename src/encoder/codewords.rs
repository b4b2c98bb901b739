use super::bit_buffer::BitBuffer;
use super::segment::Segment;
use crate::ec::ReedSolomonEncoder;
use crate::models::{ECLevel, Version};

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Data codewords for one segment: header, payload, terminator and padding
pub(crate) fn data_codewords(segment: &Segment, version: Version, ec_level: ECLevel) -> Vec<u8> {
    let capacity_bits = version.data_codewords(ec_level) * 8;
    let mut bits = BitBuffer::new();
    segment.write(version, &mut bits);
    debug_assert!(bits.len() <= capacity_bits);

    let terminator = (capacity_bits - bits.len()).min(4);
    bits.put_bits(0, terminator);
    let to_byte = (8 - bits.len() % 8) % 8;
    bits.put_bits(0, to_byte);

    let mut codewords = bits.into_bytes();
    let pad_count = capacity_bits / 8 - codewords.len();
    codewords.extend(PAD_BYTES.iter().cycle().take(pad_count));
    codewords
}

/// Split data into blocks, append parity to each and interleave
pub(crate) fn add_ec_and_interleave(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    let layout = version.block_layout(ec_level);
    let rs = ReedSolomonEncoder::new(layout.ecc_per_block);

    let mut blocks = Vec::with_capacity(layout.num_blocks);
    let mut offset = 0;
    for b in 0..layout.num_blocks {
        let len = layout.data_len(b);
        let block = &data[offset..offset + len];
        blocks.push((block, rs.encode(block)));
        offset += len;
    }

    let mut result = Vec::with_capacity(version.total_codewords());
    for i in 0..=layout.short_data_len {
        // Short blocks have no codeword at the last index
        result.extend(blocks.iter().filter_map(|(block, _)| block.get(i)));
    }
    for i in 0..layout.ecc_per_block {
        result.extend(blocks.iter().map(|(_, ecc)| ecc[i]));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_matches_reference() {
        // ISO/IEC 18004 Annex I: "01234567" at 1-M
        let segment = Segment::from_text("01234567");
        let data = data_codewords(&segment, Version::MIN, ECLevel::M);
        assert_eq!(
            data,
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
                0x11, 0xEC, 0x11
            ]
        );
        let all = add_ec_and_interleave(&data, Version::MIN, ECLevel::M);
        assert_eq!(all.len(), 26);
        assert_eq!(&all[16..], &[0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]);
    }

    #[test]
    fn test_short_terminator_when_nearly_full() {
        // 1-L holds 152 bits; 17 digits use 4 + 10 + 57 = 71 bits
        let segment = Segment::from_text("12345678901234567");
        let data = data_codewords(&segment, Version::MIN, ECLevel::L);
        assert_eq!(data.len(), 19);
    }

    #[test]
    fn test_interleave_order() {
        // 5-Q: blocks of 15, 15, 16, 16 data codewords
        let version = Version::new(5).unwrap();
        let data: Vec<u8> = (0..62u8).collect();
        let all = add_ec_and_interleave(&data, version, ECLevel::Q);
        assert_eq!(all.len(), version.total_codewords());
        assert_eq!(&all[..4], &[0, 15, 30, 46]);
        // Only the long blocks contribute a 16th codeword
        assert_eq!(&all[60..62], &[45, 61]);
    }
}
