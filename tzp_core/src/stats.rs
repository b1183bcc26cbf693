//! Summary records returned alongside encode/decode results (spec §6):
//! [`Stats`] for encode/decode operations, [`Inspection`] for read-only
//! header/table introspection.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::format::BlockEntry;
use crate::pipeline::EncodedBlock;
use crate::profile::Profile;

/// Per-algorithm tally: how many blocks used it, and how many bytes went in
/// versus came out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlgorithmTally {
    pub block_count: u32,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

pub type AlgorithmHistogram = BTreeMap<u8, AlgorithmTally>;

#[derive(Debug, Clone)]
pub struct Stats {
    pub original_size: u64,
    pub compressed_size: u64,
    pub elapsed: Duration,
    pub block_count: u32,
    pub profile: Profile,
    pub algorithm_histogram: AlgorithmHistogram,
}

impl Stats {
    /// Bytes of uncompressed input processed per second.
    pub fn throughput_mib_per_s(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        (self.original_size as f64 / (1024.0 * 1024.0)) / secs
    }

    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 1.0;
        }
        self.compressed_size as f64 / self.original_size as f64
    }
}

#[derive(Debug, Clone)]
pub struct Inspection {
    pub version: u16,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub block_count: u32,
    pub base_block_size: u32,
    pub algorithm_histogram: AlgorithmHistogram,
    pub flags: u16,
}

/// Builds a histogram from a set of block-table entries, using each entry's
/// `compressed_size`/`original_size` as the in/out byte counts.
pub fn build_histogram(entries: &[BlockEntry]) -> AlgorithmHistogram {
    let mut histogram = AlgorithmHistogram::new();
    for entry in entries {
        let tally = histogram.entry(entry.algorithm_id).or_default();
        tally.block_count += 1;
        tally.bytes_in += entry.original_size as u64;
        tally.bytes_out += entry.compressed_size as u64;
    }
    histogram
}

/// Same as [`build_histogram`], but straight from the pipeline's freshly
/// encoded blocks (the shape the Writer has on hand before block-table
/// entries are even constructed).
pub fn build_histogram_from_blocks(blocks: &[EncodedBlock]) -> AlgorithmHistogram {
    let mut histogram = AlgorithmHistogram::new();
    for block in blocks {
        let tally = histogram.entry(block.algorithm_id.as_u8()).or_default();
        tally.block_count += 1;
        tally.bytes_in += block.original_size as u64;
        tally.bytes_out += block.compressed.len() as u64;
    }
    histogram
}
