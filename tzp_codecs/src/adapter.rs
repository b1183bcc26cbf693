use crate::algorithm::AlgorithmId;
use crate::error::CodecError;
use crate::zstd_codec::ZstdPool;
use crate::{hybrid, lz4_codec, passthrough, zstd_codec};

/// The "two operations" of spec §4.A: `encode(algorithm_id, bytes)` and
/// `decode(algorithm_id, compressed_bytes, original_size)`, plus the pooled
/// state (Zstd compressors by level) those operations share across blocks.
///
/// One `CodecAdapter` is built per encode/decode operation and shared
/// read-only across the parallel engine's workers.
pub struct CodecAdapter {
    zstd: ZstdPool,
}

impl CodecAdapter {
    pub fn new() -> Self {
        Self {
            zstd: ZstdPool::new(),
        }
    }

    /// Encode `data` with `algorithm`. Returns the emitted bytes and the
    /// concrete algorithm id actually used — equal to `algorithm` for every
    /// variant except `Hybrid` (may downgrade to `Lz4Hc` or `Uncompressed`)
    /// and `Adaptive` (resolves to whichever candidate won).
    pub fn encode(
        &self,
        algorithm: AlgorithmId,
        data: &[u8],
    ) -> Result<(Vec<u8>, AlgorithmId), CodecError> {
        match algorithm {
            AlgorithmId::Uncompressed => Ok((passthrough::encode(data), AlgorithmId::Uncompressed)),
            AlgorithmId::Lz4Fast | AlgorithmId::Lz4Hc => {
                Ok((lz4_codec::compress_frame(data)?, algorithm))
            }
            AlgorithmId::Zstd1 | AlgorithmId::Zstd6 | AlgorithmId::Zstd15 | AlgorithmId::Zstd22 => {
                let level = algorithm
                    .zstd_level()
                    .expect("every Zstd* variant carries a level");
                Ok((self.zstd.compress(level, data)?, algorithm))
            }
            AlgorithmId::Hybrid => hybrid::encode(&self.zstd, data),
            AlgorithmId::Adaptive => self.encode_adaptive(data),
        }
    }

    /// Runtime competitive selection among a small set of cheap-to-try
    /// candidates, keeping whichever produces the smallest output. The
    /// catalogue's `Adaptive` id is never itself written to a block table
    /// entry — the winner's concrete id is (spec §3: "stored as whichever
    /// concrete algorithm won").
    fn encode_adaptive(&self, data: &[u8]) -> Result<(Vec<u8>, AlgorithmId), CodecError> {
        const CANDIDATES: [AlgorithmId; 3] =
            [AlgorithmId::Lz4Fast, AlgorithmId::Zstd6, AlgorithmId::Zstd15];

        let mut best: Option<(Vec<u8>, AlgorithmId)> = None;
        for candidate in CANDIDATES {
            let (bytes, _) = self.encode(candidate, data)?;
            let is_better = match &best {
                None => true,
                Some((current, _)) => bytes.len() < current.len(),
            };
            if is_better {
                best = Some((bytes, candidate));
            }
        }
        Ok(best.expect("CANDIDATES is non-empty"))
    }

    /// Decode `compressed` (known to be `original_size` bytes once decoded)
    /// under `algorithm`.
    pub fn decode(
        &self,
        algorithm: AlgorithmId,
        compressed: &[u8],
        original_size: usize,
    ) -> Result<Vec<u8>, CodecError> {
        match algorithm {
            AlgorithmId::Uncompressed => Ok(passthrough::decode(compressed)),
            AlgorithmId::Lz4Fast | AlgorithmId::Lz4Hc => {
                // The Stable writer emits LZ4 frames; legacy v1/v2 containers
                // carry the self-describing block format instead. Frame
                // decode fails fast on non-frame input, so fall back to it.
                match lz4_codec::decompress_frame(compressed) {
                    Ok(bytes) => Ok(bytes),
                    Err(_) => lz4_codec::decompress_block_prefixed(compressed)
                        .or_else(|_| lz4_codec::decompress_block_sized(compressed, original_size)),
                }
            }
            AlgorithmId::Zstd1
            | AlgorithmId::Zstd6
            | AlgorithmId::Zstd15
            | AlgorithmId::Zstd22
            | AlgorithmId::Adaptive => zstd_codec::decompress_sized(compressed, original_size),
            AlgorithmId::Hybrid => hybrid::decode(compressed, original_size),
        }
    }
}

impl Default for CodecAdapter {
    fn default() -> Self {
        Self::new()
    }
}
