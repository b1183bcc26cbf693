use crate::algorithm::AlgorithmId;
use crate::error::CodecError;
use crate::lz4_codec;
use crate::zstd_codec::{self, ZstdPool};

/// LZ4-HC must shrink the buffer below this fraction of its original size
/// before Zstd is even tried on top of it.
const LZ4_STAGE_THRESHOLD: f64 = 0.9;
/// Zstd-on-LZ4 must shrink the LZ4 output below this fraction to be kept
/// over the plain LZ4-HC result.
const ZSTD_STAGE_THRESHOLD: f64 = 0.95;

fn ratio(compressed: usize, original: usize) -> f64 {
    if original == 0 {
        1.0
    } else {
        compressed as f64 / original as f64
    }
}

/// Two-stage cascade: LZ4-HC, then Zstd-6 on top if the first stage helped
/// enough. Returns the emitted bytes and the algorithm id that actually won
/// — `Hybrid` only if both stages cleared their thresholds, `Lz4Hc` if only
/// the first did, `Uncompressed` if neither did.
pub fn encode(zstd: &ZstdPool, data: &[u8]) -> Result<(Vec<u8>, AlgorithmId), CodecError> {
    let lz4_hc = lz4_codec::compress_block_sized(data);
    if ratio(lz4_hc.len(), data.len()) >= LZ4_STAGE_THRESHOLD {
        return Ok((data.to_vec(), AlgorithmId::Uncompressed));
    }

    let cascaded = zstd.compress(6, &lz4_hc)?;
    if ratio(cascaded.len(), lz4_hc.len()) < ZSTD_STAGE_THRESHOLD {
        Ok((cascaded, AlgorithmId::Hybrid))
    } else {
        Ok((lz4_hc, AlgorithmId::Lz4Hc))
    }
}

/// Hybrid decode is fixed regardless of which revision wrote the block:
/// Zstd-decode first (recovering the LZ4-compressed intermediate), then
/// LZ4-block-decode that back to the original bytes. A v3 Ultimate file
/// whose hybrid block doesn't fit this shape surfaces as `CodecError`.
pub fn decode(compressed: &[u8], original_size: usize) -> Result<Vec<u8>, CodecError> {
    let intermediate = zstd_codec::decompress_self_describing(compressed)?;
    lz4_codec::decompress_block_sized(&intermediate, original_size)
}
