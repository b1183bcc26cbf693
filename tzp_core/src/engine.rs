//! Parallel Engine (spec §4.E, §5): bounded worker-pool fan-out over
//! blocks, with deterministic block-id-ordered reassembly independent of
//! completion order. Grounded on the teacher's single-threaded block loop,
//! generalized to a scoped `rayon` pool the way `jafreck-lz4r` parallelizes
//! block-level codec work in the wider retrieval pack.

use rayon::prelude::*;
use rayon::ThreadPool;

use tzp_codecs::{AlgorithmId, CodecAdapter};

use crate::error::TzpError;
use crate::format::{BlockEntry, Revision};
use crate::pipeline::{self, EncodedBlock};
use crate::profile::Profile;

/// Caps the worker count at 16 regardless of what the caller or the
/// hardware offers (spec §4.E: `N = min(configured_or_auto, 16)`).
pub const MAX_THREADS: usize = 16;

pub fn resolve_thread_count(requested: Option<usize>) -> usize {
    let base = requested.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    base.clamp(1, MAX_THREADS)
}

/// Builds a scoped pool for one operation — never the global Rayon pool, so
/// concurrent encode/decode calls in one process don't contend over thread
/// count (spec §5: "each instance used by one worker at a time").
pub fn build_pool(requested: Option<usize>) -> Result<ThreadPool, TzpError> {
    let n = resolve_thread_count(requested);
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| TzpError::Io(std::io::Error::other(e.to_string())))
}

/// Runs the Block Pipeline over every span in parallel, in a thread pool
/// scoped to this one operation. `par_iter().map().collect()` into a `Vec`
/// preserves input order regardless of completion order, which is the
/// entirety of the ordering guarantee this needs (spec §4.E).
pub fn encode_blocks(
    pool: &ThreadPool,
    adapter: &CodecAdapter,
    spans: &[(usize, usize)],
    data: &[u8],
    profile: Profile,
) -> Vec<EncodedBlock> {
    let input_size = data.len();
    pool.install(|| {
        spans
            .par_iter()
            .map(|&(start, end)| {
                pipeline::encode_block(adapter, &data[start..end], profile, input_size)
            })
            .collect()
    })
}

/// Decodes every block-table entry in parallel. `resolve_span` extracts the
/// entry's compressed payload slice from the full container buffer (the
/// Reader already knows the payload's base offset). `revision` identifies
/// which header shape `entries` were parsed from, since the algorithm-id
/// mapping and the preprocessing flag only mean what they mean for
/// particular revisions (spec §4.G, §9, DESIGN.md Open Question 1).
pub fn decode_blocks<'a, F>(
    pool: &ThreadPool,
    adapter: &CodecAdapter,
    entries: &[BlockEntry],
    revision: Revision,
    resolve_span: F,
) -> Result<Vec<Vec<u8>>, TzpError>
where
    F: Fn(&BlockEntry) -> &'a [u8] + Sync,
{
    pool.install(|| {
        entries
            .par_iter()
            .map(|entry| decode_one_block(adapter, entry, revision, resolve_span(entry)))
            .collect()
    })
}

fn decode_one_block(
    adapter: &CodecAdapter,
    entry: &BlockEntry,
    revision: Revision,
    compressed: &[u8],
) -> Result<Vec<u8>, TzpError> {
    // v1's algorithm byte is its own small enum (0x00 LZ4, 0x01 Zstd,
    // 0xFF uncompressed), distinct from the canonical catalogue every
    // later revision writes directly.
    let algorithm = if revision == Revision::V1 {
        AlgorithmId::from_v1_byte(entry.algorithm_id)
    } else {
        AlgorithmId::from_u8(entry.algorithm_id)
    }
    .map_err(|_| TzpError::UnknownAlgorithm(entry.algorithm_id))?;

    let mut decoded = adapter.decode(algorithm, compressed, entry.original_size as usize)?;

    // `FLAG_PREPROCESSED` only has this meaning on a v3 Ultimate entry. On
    // v1 the same byte position holds `compression_level` (e.g. `6` for a
    // Zstd-6 block), which happens to collide with the bit pattern here,
    // so this must never be checked for any other revision.
    if revision == Revision::V3Ultimate && entry.is_preprocessed() {
        // The wire format carries no separate "which transform" bit, but
        // the two transforms are distinguishable after the fact:
        // delta-encode is length-preserving (it's a one-to-one u32
        // remap), while RLE was only ever kept when it shrank the buffer
        // below 80% of `original_size`. So a transformed buffer exactly
        // `original_size` bytes long was delta-encoded; anything shorter
        // was RLE.
        decoded = if decoded.len() == entry.original_size as usize {
            pipeline::delta_decode(&decoded)
        } else {
            pipeline::rle_decode(&decoded)
        };
    }

    let crc = crc32fast::hash(&decoded);
    if crc != entry.crc32 {
        return Err(TzpError::IntegrityError(format!(
            "block crc32 mismatch: expected {:08x}, got {:08x}",
            entry.crc32, crc
        )));
    }
    if decoded.len() != entry.original_size as usize {
        return Err(TzpError::SizeMismatch {
            expected: entry.original_size as usize,
            actual: decoded.len(),
        });
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_count_is_capped_at_sixteen() {
        assert_eq!(resolve_thread_count(Some(64)), MAX_THREADS);
        assert_eq!(resolve_thread_count(Some(1)), 1);
    }

    #[test]
    fn encode_blocks_preserves_order() {
        let adapter = CodecAdapter::new();
        let data: Vec<u8> = (0..4096u32).flat_map(|v| v.to_le_bytes()).collect();
        let spans = crate::partitioner::partition_fixed(data.len(), 1024);
        let pool = build_pool(Some(4)).unwrap();
        let blocks = encode_blocks(&pool, &adapter, &spans, &data, Profile::Balanced);
        assert_eq!(blocks.len(), spans.len());
        for (block, &(start, end)) in blocks.iter().zip(&spans) {
            assert_eq!(block.original_size as usize, end - start);
        }
    }
}
