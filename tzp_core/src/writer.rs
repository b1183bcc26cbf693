//! Container Writer (spec §4.F, §7): the only emission path this crate has,
//! producing v3.1 Stable containers exclusively. Grounded on the teacher's
//! single-pass `Writer`, generalized to partition → parallel-encode →
//! serialize instead of one fixed codec per file.

use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::engine;
use crate::error::TzpError;
use crate::format::{
    self, BlockEntry, CommonPrefix, FLAG_OPTIMIZED, MAGIC_V3_STABLE, VERSION_V3_STABLE,
};
use crate::partitioner;
use crate::pipeline::EncodedBlock;
use crate::profile::Profile;
use tzp_codecs::CodecAdapter;

/// Knobs accepted by [`encode`]/[`encode_file`].
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub profile: Profile,
    pub block_size: Option<u32>,
    pub threads: Option<usize>,
    pub adaptive: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Balanced,
            block_size: None,
            threads: None,
            adaptive: false,
        }
    }
}

/// The Writer's view of one completed encode: the container bytes plus the
/// per-block results the caller needs to assemble stats.
pub struct WriteResult {
    pub container: Vec<u8>,
    pub blocks: Vec<EncodedBlock>,
}

/// File-level checksum per spec §4.H: not a hash of the input bytes, but of
/// the ASCII-decimal `uncompressed_size`. A historical quirk of the v3.1
/// shape this crate preserves for wire compatibility.
fn file_checksum(uncompressed_size: u64) -> [u8; 8] {
    let digest = Sha256::digest(uncompressed_size.to_string().as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Builds a complete v3.1 Stable container in memory.
pub fn encode(input: &[u8], opts: &EncodeOptions) -> Result<WriteResult, TzpError> {
    let block_size = opts.block_size.unwrap_or(format::DEFAULT_BLOCK_SIZE);
    let spans = if opts.adaptive {
        partitioner::partition_adaptive(input, block_size)
    } else {
        partitioner::partition_fixed(input.len(), block_size)
    };

    let adapter = CodecAdapter::new();
    let pool = engine::build_pool(opts.threads)?;
    let blocks = engine::encode_blocks(&pool, &adapter, &spans, input, opts.profile);

    // `payload_offset` is relative to the start of the payload section, not
    // the start of the file: block 0 always starts at offset 0 (spec §8,
    // Testable Property 3).
    let mut entries = Vec::with_capacity(blocks.len());
    let mut payload_offset = 0u64;
    for block in &blocks {
        entries.push(BlockEntry {
            payload_offset,
            compressed_size: block.compressed.len() as u32,
            original_size: block.original_size,
            algorithm_id: block.algorithm_id.as_u8(),
            revision_byte: 0,
            crc32: block.crc32,
            content_type: None,
            compression_potential: None,
        });
        payload_offset += block.compressed.len() as u64;
    }

    let prefix = CommonPrefix {
        magic: MAGIC_V3_STABLE,
        version: VERSION_V3_STABLE,
        flags: FLAG_OPTIMIZED,
        uncompressed_size: input.len() as u64,
        block_count: blocks.len() as u32,
        base_block_size: block_size,
        file_checksum: file_checksum(input.len() as u64),
    };

    let header_and_table_size =
        format::HEADER_SIZE_STABLE + format::ENTRY_SIZE_STABLE * blocks.len() as u64;
    let mut out = Vec::with_capacity((header_and_table_size + payload_offset) as usize);
    out.extend_from_slice(&format::write_stable_header(&prefix));
    for entry in &entries {
        out.extend_from_slice(&entry.to_stable_bytes());
    }
    for block in &blocks {
        out.extend_from_slice(&block.compressed);
    }

    debug_assert_eq!(out.len() as u64, header_and_table_size + payload_offset);
    Ok(WriteResult {
        container: out,
        blocks,
    })
}

/// Reads `input_path`, encodes it, and atomically replaces `output_path`
/// (write to a sibling temp file, then rename — a crash mid-write must never
/// leave a half-written file at the destination path).
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &EncodeOptions,
) -> Result<(usize, WriteResult), TzpError> {
    let input = std::fs::read(input_path)?;
    let result = encode(&input, opts)?;

    let dir = output_path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new()?,
    };
    tmp.write_all(&result.container)?;
    tmp.flush()?;
    tmp.persist(output_path).map_err(|e| TzpError::Io(e.error))?;

    Ok((input.len(), result))
}
