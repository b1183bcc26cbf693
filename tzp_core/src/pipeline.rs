//! Block Pipeline (spec §4.C): per-block analysis, profile-adjusted
//! algorithm choice, encode, and the not-worth-compressing gate.
//!
//! Delta-encode and RLE are implemented here as pure, independently tested
//! functions — the capability the original `tzp_ultimate.py` wired into its
//! block class — but the Writer's only emission path (v3.1 Stable) never
//! calls them; see `DESIGN.md`'s Open Question 1 for why.

use tzp_codecs::{AlgorithmId, CodecAdapter};

use crate::analyzer;
use crate::profile::Profile;

/// Gate used by the writer's only emission path (v3.1 Stable). The
/// historical v1/v2 shapes used 0.95/0.97 respectively — read-path
/// knowledge only, since this crate never writes those shapes.
pub const STABLE_GATE_THRESHOLD: f64 = 0.98;

#[derive(Debug, Clone)]
pub struct EncodedBlock {
    pub compressed: Vec<u8>,
    pub algorithm_id: AlgorithmId,
    pub original_size: u32,
    pub crc32: u32,
}

/// Runs one block through analysis, profile-adjusted codec selection,
/// encoding, and the not-worth-compressing gate. Never fails: any codec
/// error or a result that doesn't clear the gate both resolve to storing
/// the block uncompressed (spec §4.A, §4.C).
pub fn encode_block(
    adapter: &CodecAdapter,
    data: &[u8],
    profile: Profile,
    input_size: usize,
) -> EncodedBlock {
    let crc32 = crc32fast::hash(data);
    let original_size = data.len() as u32;

    let analysis = analyzer::analyze(data, input_size);
    let recommended = profile.adjust(analysis.recommended_algorithm);

    let (mut compressed, mut algorithm_id) = match adapter.encode(recommended, data) {
        Ok(result) => result,
        Err(_) => (data.to_vec(), AlgorithmId::Uncompressed),
    };

    if gate_rejects(compressed.len(), data.len()) {
        compressed = data.to_vec();
        algorithm_id = AlgorithmId::Uncompressed;
    }

    EncodedBlock {
        compressed,
        algorithm_id,
        original_size,
        crc32,
    }
}

fn gate_rejects(compressed_len: usize, original_len: usize) -> bool {
    if original_len == 0 {
        return false;
    }
    compressed_len as f64 >= STABLE_GATE_THRESHOLD * original_len as f64
}

/// Delta-encodes a buffer interpreted as little-endian u32s: the first u32
/// is kept verbatim, every later one is replaced by its signed difference
/// from its predecessor. Same length as the input.
///
/// Only applicable when `data.len()` is a multiple of 4 — callers check
/// [`delta_is_applicable`] first.
pub fn delta_encode(data: &[u8]) -> Vec<u8> {
    debug_assert_eq!(data.len() % 4, 0);
    let words: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    let mut out = Vec::with_capacity(data.len());
    if let Some(&first) = words.first() {
        out.extend_from_slice(&first.to_le_bytes());
        for pair in words.windows(2) {
            let diff = (pair[1] as i64 - pair[0] as i64) as i32;
            out.extend_from_slice(&diff.to_le_bytes());
        }
    }
    out
}

pub fn delta_decode(data: &[u8]) -> Vec<u8> {
    debug_assert_eq!(data.len() % 4, 0);
    let mut words: Vec<u32> = Vec::with_capacity(data.len() / 4);
    let mut chunks = data.chunks_exact(4);
    if let Some(first) = chunks.next() {
        let mut current = u32::from_le_bytes(first.try_into().unwrap());
        words.push(current);
        for chunk in chunks {
            let diff = i32::from_le_bytes(chunk.try_into().unwrap());
            current = (current as i64 + diff as i64) as u32;
            words.push(current);
        }
    }
    words.into_iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// True when ≥80% of consecutive u32 differences equal the modal
/// difference — the precondition spec §4.C requires before delta-encoding
/// is even attempted.
pub fn delta_is_applicable(data: &[u8]) -> bool {
    if data.len() % 4 != 0 || data.len() < 8 {
        return false;
    }
    let words: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    let diffs: Vec<i64> = words.windows(2).map(|p| p[1] as i64 - p[0] as i64).collect();
    if diffs.is_empty() {
        return false;
    }
    let mut counts = std::collections::HashMap::new();
    for &d in &diffs {
        *counts.entry(d).or_insert(0u32) += 1;
    }
    let modal_count = counts.values().copied().max().unwrap_or(0);
    modal_count as f64 / diffs.len() as f64 >= 0.8
}

/// Run-length encodes as `(count, byte)` pairs, runs capped at 255.
pub fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        let mut run = 1usize;
        while i + run < data.len() && data[i + run] == byte && run < 255 {
            run += 1;
        }
        out.push(run as u8);
        out.push(byte);
        i += run;
    }
    out
}

pub fn rle_decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for pair in data.chunks_exact(2) {
        out.extend(std::iter::repeat(pair[1]).take(pair[0] as usize));
    }
    out
}

/// Shrink ratio required before a pre-processing transform is kept (spec
/// §4.C: "tried, kept only if it shrinks the buffer to ≤ 80% of original").
pub const PREPROCESS_SHRINK_THRESHOLD: f64 = 0.8;
