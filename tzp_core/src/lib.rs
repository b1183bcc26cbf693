//! TZP container library: partition, analyze, compress, and reassemble
//! general-purpose byte streams into the "Turbo Zip" block container
//! format. See `writer`/`reader` for the encode/decode entry points this
//! module re-exports.

pub mod analyzer;
pub mod engine;
pub mod error;
pub mod format;
pub mod partitioner;
pub mod pipeline;
pub mod profile;
pub mod reader;
pub mod stats;
pub mod writer;

use std::path::Path;

pub use error::TzpError;
pub use format::{BlockEntry, Header};
pub use profile::Profile;
pub use stats::{AlgorithmHistogram, AlgorithmTally, Inspection, Stats};
pub use writer::EncodeOptions;

/// Encodes `input` into a complete v3.1 Stable container, returning the
/// container bytes alongside a summary of the encode.
pub fn encode(input: &[u8], opts: &EncodeOptions) -> Result<(Vec<u8>, Stats), TzpError> {
    let started = std::time::Instant::now();
    let result = writer::encode(input, opts)?;
    let histogram = stats::build_histogram_from_blocks(&result.blocks);

    let compressed_size: u64 = result.blocks.iter().map(|b| b.compressed.len() as u64).sum();
    let stats = Stats {
        original_size: input.len() as u64,
        compressed_size,
        elapsed: started.elapsed(),
        block_count: result.blocks.len() as u32,
        profile: opts.profile,
        algorithm_histogram: histogram,
    };

    Ok((result.container, stats))
}

/// Reads `input_path`, encodes it, and atomically writes `output_path`.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &EncodeOptions,
) -> Result<Stats, TzpError> {
    let started = std::time::Instant::now();
    let (original_len, result) = writer::encode_file(input_path, output_path, opts)?;
    let histogram = stats::build_histogram_from_blocks(&result.blocks);
    let compressed_size: u64 = result.blocks.iter().map(|b| b.compressed.len() as u64).sum();

    Ok(Stats {
        original_size: original_len as u64,
        compressed_size,
        elapsed: started.elapsed(),
        block_count: result.blocks.len() as u32,
        profile: opts.profile,
        algorithm_histogram: histogram,
    })
}

/// Decodes a complete container buffer back to its original bytes.
pub fn decode(container: &[u8]) -> Result<(Vec<u8>, Stats), TzpError> {
    reader::decode(container, None)
}

/// Reads a container from `input_path`, decodes it, and writes the
/// recovered bytes to `output_path`.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    threads: Option<usize>,
) -> Result<Stats, TzpError> {
    let container = std::fs::read(input_path)?;
    let (out, stats) = reader::decode(&container, threads)?;
    std::fs::write(output_path, out)?;
    Ok(stats)
}

/// Parses a container's header and block table without decoding any
/// payload bytes — a cheap, read-only summary of what the file contains.
pub fn inspect(container: &[u8]) -> Result<Inspection, TzpError> {
    let parsed = reader::parse(container)?;
    let prefix = parsed.header.prefix();
    let histogram = stats::build_histogram(&parsed.entries);
    let compressed_size: u64 = parsed.entries.iter().map(|e| e.compressed_size as u64).sum();

    Ok(Inspection {
        version: prefix.version,
        uncompressed_size: prefix.uncompressed_size,
        compressed_size,
        block_count: prefix.block_count,
        base_block_size: prefix.base_block_size,
        algorithm_histogram: histogram,
        flags: prefix.flags,
    })
}
