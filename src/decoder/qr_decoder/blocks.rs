use crate::ec::ReedSolomonDecoder;
use crate::error::{QrError, Result};
use crate::models::{ECLevel, Version};
use tracing::{debug, trace};

/// Split interleaved codewords into blocks, correct each one and
/// concatenate the data portions in block order.
pub(crate) fn deinterleave_and_correct(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>> {
    let layout = version.block_layout(ec_level);
    if codewords.len() != version.total_codewords() {
        return Err(QrError::InvalidInput(format!(
            "{} codewords read, version {version} holds {}",
            codewords.len(),
            version.total_codewords()
        )));
    }

    let mut blocks: Vec<Vec<u8>> = (0..layout.num_blocks)
        .map(|b| Vec::with_capacity(layout.block_len(b)))
        .collect();

    let mut source = codewords.iter().copied();
    let long_len = layout.short_data_len + 1;
    for i in 0..long_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < layout.data_len(b) {
                block.extend(source.next());
            }
        }
    }
    for _ in 0..layout.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(source.next());
        }
    }

    let rs = ReedSolomonDecoder::new(layout.ecc_per_block);
    let mut data_out = Vec::with_capacity(layout.total_data());
    for (b, block) in blocks.iter_mut().enumerate() {
        match rs.decode(block) {
            Ok(0) => {}
            Ok(corrected) => trace!(block = b, corrected, "block corrected"),
            Err(err) => {
                debug!(block = b, %err, "block uncorrectable");
                return Err(QrError::UncorrectableError { block: b });
            }
        }
        data_out.extend_from_slice(&block[..layout.data_len(b)]);
    }

    Ok(data_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::ReedSolomonEncoder;

    /// Interleave data the way a symbol stores it
    fn interleave(version: Version, ec_level: ECLevel, data: &[u8]) -> Vec<u8> {
        let layout = version.block_layout(ec_level);
        let rs = ReedSolomonEncoder::new(layout.ecc_per_block);
        let mut offset = 0;
        let mut blocks = Vec::new();
        for b in 0..layout.num_blocks {
            let chunk = &data[offset..offset + layout.data_len(b)];
            offset += chunk.len();
            blocks.push((chunk.to_vec(), rs.encode(chunk)));
        }
        let mut out = Vec::new();
        for i in 0..=layout.short_data_len {
            out.extend(blocks.iter().filter_map(|(d, _)| d.get(i)));
        }
        for i in 0..layout.ecc_per_block {
            out.extend(blocks.iter().map(|(_, e)| e[i]));
        }
        out
    }

    #[test]
    fn test_deinterleave_mixed_blocks() {
        let version = Version::new(5).unwrap();
        let data: Vec<u8> = (0..version.data_codewords(ECLevel::Q) as u32)
            .map(|i| (i * 7) as u8)
            .collect();
        let codewords = interleave(version, ECLevel::Q, &data);
        assert_eq!(
            deinterleave_and_correct(&codewords, version, ECLevel::Q).unwrap(),
            data
        );
    }

    #[test]
    fn test_corrects_errors_spread_across_blocks() {
        let version = Version::new(5).unwrap();
        let data: Vec<u8> = (0..62u8).collect();
        let mut codewords = interleave(version, ECLevel::Q, &data);
        // Consecutive codewords land in different blocks
        for cw in codewords.iter_mut().take(12) {
            *cw ^= 0x5A;
        }
        assert_eq!(
            deinterleave_and_correct(&codewords, version, ECLevel::Q).unwrap(),
            data
        );
    }

    #[test]
    fn test_reports_failing_block() {
        let version = Version::MIN;
        let data = vec![
            0x40, 0x00, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        let mut codewords = interleave(version, ECLevel::M, &data);
        for cw in codewords.iter_mut().take(12) {
            *cw = !*cw;
        }
        assert_eq!(
            deinterleave_and_correct(&codewords, version, ECLevel::M),
            Err(QrError::UncorrectableError { block: 0 })
        );
    }
}
