//! Container Reader (spec §4.G, §6): parses any of the four header/block-
//! table revisions, decodes every block in parallel, and reassembles the
//! original bytes in block-id order. Grounded on the teacher's sequential
//! `Reader::open`, generalized to multi-version dispatch and whole-buffer
//! decode instead of the teacher's random-access `read_block`/`read_range`
//! (dropped entirely — out of scope for this format, spec §1).

use sha2::{Digest, Sha256};

use crate::engine;
use crate::error::TzpError;
use crate::format::{self, BlockEntry, Header, FLAG_FULL_CHECKSUM};
use crate::stats::{self, Stats};
use tzp_codecs::CodecAdapter;

/// One fully-parsed container: header plus block table, before payload
/// bytes have been touched.
pub struct ParsedContainer<'a> {
    pub header: Header,
    pub entries: Vec<BlockEntry>,
    payload: &'a [u8],
}

fn file_checksum(uncompressed_size: u64) -> [u8; 8] {
    let digest = Sha256::digest(uncompressed_size.to_string().as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Parses the header and block table out of `container`, without decoding
/// any block payloads yet.
pub fn parse(container: &[u8]) -> Result<ParsedContainer<'_>, TzpError> {
    let header = Header::parse(container)?;
    let prefix = header.prefix();
    let entry_size = header.entry_size() as usize;
    let header_size = header.header_size() as usize;

    let table_start = header_size;
    let table_end = table_start + entry_size * prefix.block_count as usize;
    let table = container.get(table_start..table_end).ok_or_else(|| {
        TzpError::InvalidFormat("block table extends past end of buffer".into())
    })?;

    let mut entries = Vec::with_capacity(prefix.block_count as usize);
    for chunk in table.chunks_exact(entry_size) {
        let entry = match &header {
            Header::V1(_) => BlockEntry::parse_v1(chunk)?,
            Header::V2 { .. } => BlockEntry::parse_v2(chunk)?,
            Header::V3Ultimate { .. } => BlockEntry::parse_v3_ultimate(chunk)?,
            Header::Stable(_) => BlockEntry::parse_stable(chunk)?,
        };
        entries.push(entry);
    }

    let payload = container
        .get(table_end..)
        .ok_or_else(|| TzpError::InvalidFormat("buffer truncated before payload".into()))?;

    Ok(ParsedContainer {
        header,
        entries,
        payload,
    })
}

/// Decodes a fully-parsed container back to its original bytes, using a
/// pool sized by `threads`.
fn decode_parsed(parsed: &ParsedContainer<'_>, threads: Option<usize>) -> Result<Vec<u8>, TzpError> {
    let prefix = parsed.header.prefix();

    if prefix.flags & FLAG_FULL_CHECKSUM != 0 {
        let expected = file_checksum(prefix.uncompressed_size);
        if expected != prefix.file_checksum {
            return Err(TzpError::IntegrityError(
                "file checksum mismatch on decimal-size tag".into(),
            ));
        }
    }

    let adapter = CodecAdapter::new();
    let pool = engine::build_pool(threads)?;
    let payload = parsed.payload;
    let revision = parsed.header.revision();

    let decoded_blocks =
        engine::decode_blocks(&pool, &adapter, &parsed.entries, revision, |entry| {
            let start = entry.payload_offset as usize;
            let end = start + entry.compressed_size as usize;
            &payload[start..end]
        })?;

    let mut out = Vec::with_capacity(prefix.uncompressed_size as usize);
    for block in decoded_blocks {
        out.extend_from_slice(&block);
    }

    if out.len() as u64 != prefix.uncompressed_size {
        return Err(TzpError::SizeMismatch {
            expected: prefix.uncompressed_size as usize,
            actual: out.len(),
        });
    }

    Ok(out)
}

/// Decodes a complete container buffer, returning the original bytes and a
/// [`Stats`] summary of what was read.
pub fn decode(container: &[u8], threads: Option<usize>) -> Result<(Vec<u8>, Stats), TzpError> {
    let started = std::time::Instant::now();
    let parsed = parse(container)?;
    let out = decode_parsed(&parsed, threads)?;

    let histogram = stats::build_histogram(&parsed.entries);
    let compressed_size: u64 = parsed.entries.iter().map(|e| e.compressed_size as u64).sum();

    let stats = Stats {
        original_size: out.len() as u64,
        compressed_size,
        elapsed: started.elapsed(),
        block_count: parsed.entries.len() as u32,
        profile: crate::profile::Profile::default(),
        algorithm_histogram: histogram,
    };

    Ok((out, stats))
}
