//! On-disk byte layouts for every container revision this crate understands.
//!
//! The Writer only ever emits [`HeaderStable`]/[`BlockEntryStable`] (the
//! v3.1 "Stable" shape). The Reader additionally parses v1, v2, and v3
//! "Ultimate" files for decode compatibility. See `DESIGN.md` for how the
//! per-revision byte widths below were reconciled against inconsistencies
//! in the historical reference implementation.

use crate::error::TzpError;

pub const MAGIC_V1: u32 = 0x545A_5000;
pub const MAGIC_V2: u32 = 0x545A_5001;
pub const MAGIC_V3_ULTIMATE: u32 = 0x545A_5002;
pub const MAGIC_V3_STABLE: u32 = 0x545A_5003;

pub const VERSION_V1: u16 = 0x0100;
pub const VERSION_V2: u16 = 0x0200;
pub const VERSION_V3_ULTIMATE: u16 = 0x0300;
pub const VERSION_V3_STABLE: u16 = 0x0301;

pub const FLAG_FULL_CHECKSUM: u16 = 0x0002;
pub const FLAG_OPTIMIZED: u16 = 0x0001;

/// Set on a v3 Ultimate block-table entry whose payload was run through
/// delta-encode or RLE before compression. The Stable shape's trailing
/// reserved field has no corresponding bit — see `DESIGN.md` Open Question 1.
pub const FLAG_PREPROCESSED: u8 = 0x04;

pub const DEFAULT_BLOCK_SIZE: u32 = 4 * 1024 * 1024;

pub const HEADER_SIZE_V1: u64 = 52;
pub const HEADER_FIXED_PREFIX: u64 = 32;
pub const HEADER_SIZE_STABLE: u64 = 48;

pub const ENTRY_SIZE_V1: u64 = 22;
pub const ENTRY_SIZE_V2: u64 = 24;
pub const ENTRY_SIZE_V3_ULTIMATE: u64 = 26;
pub const ENTRY_SIZE_STABLE: u64 = 24;

fn take<'a>(buf: &'a [u8], start: usize, len: usize) -> Result<&'a [u8], TzpError> {
    buf.get(start..start + len)
        .ok_or_else(|| TzpError::InvalidFormat("truncated header or block table".into()))
}

/// The 32-byte prefix shared by every revision: magic, version, flags,
/// uncompressed_size, block_count, base_block_size, file_checksum(8).
#[derive(Debug, Clone)]
pub struct CommonPrefix {
    pub magic: u32,
    pub version: u16,
    pub flags: u16,
    pub uncompressed_size: u64,
    pub block_count: u32,
    pub base_block_size: u32,
    pub file_checksum: [u8; 8],
}

impl CommonPrefix {
    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.magic.to_le_bytes());
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.flags.to_le_bytes());
        buf.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        buf.extend_from_slice(&self.block_count.to_le_bytes());
        buf.extend_from_slice(&self.base_block_size.to_le_bytes());
        buf.extend_from_slice(&self.file_checksum);
    }

    fn parse(buf: &[u8]) -> Result<Self, TzpError> {
        let b = take(buf, 0, HEADER_FIXED_PREFIX as usize)?;
        let mut file_checksum = [0u8; 8];
        file_checksum.copy_from_slice(&b[24..32]);
        Ok(Self {
            magic: u32::from_le_bytes(b[0..4].try_into().unwrap()),
            version: u16::from_le_bytes(b[4..6].try_into().unwrap()),
            flags: u16::from_le_bytes(b[6..8].try_into().unwrap()),
            uncompressed_size: u64::from_le_bytes(b[8..16].try_into().unwrap()),
            block_count: u32::from_le_bytes(b[16..20].try_into().unwrap()),
            base_block_size: u32::from_le_bytes(b[20..24].try_into().unwrap()),
            file_checksum,
        })
    }
}

/// Any header revision the reader can parse, normalized to one shape plus
/// whatever revision-specific trailing data accompanied it.
#[derive(Debug, Clone)]
pub enum Header {
    V1(CommonPrefix),
    V2 { prefix: CommonPrefix, metadata: Vec<u8> },
    V3Ultimate { prefix: CommonPrefix, metadata: Vec<u8> },
    Stable(CommonPrefix),
}

/// Which on-disk revision a parsed header belongs to. Block-table entries
/// don't carry this themselves, so it has to be threaded alongside them
/// into decode — the same `algorithm_id` byte and flags byte mean different
/// things on a v1 entry than on a Stable one (spec §4.G, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    V1,
    V2,
    V3Ultimate,
    Stable,
}

impl Header {
    pub fn prefix(&self) -> &CommonPrefix {
        match self {
            Header::V1(p) => p,
            Header::V2 { prefix, .. } => prefix,
            Header::V3Ultimate { prefix, .. } => prefix,
            Header::Stable(p) => p,
        }
    }

    pub fn revision(&self) -> Revision {
        match self {
            Header::V1(_) => Revision::V1,
            Header::V2 { .. } => Revision::V2,
            Header::V3Ultimate { .. } => Revision::V3Ultimate,
            Header::Stable(_) => Revision::Stable,
        }
    }

    pub fn entry_size(&self) -> u64 {
        match self {
            Header::V1(_) => ENTRY_SIZE_V1,
            Header::V2 { .. } => ENTRY_SIZE_V2,
            Header::V3Ultimate { .. } => ENTRY_SIZE_V3_ULTIMATE,
            Header::Stable(_) => ENTRY_SIZE_STABLE,
        }
    }

    /// Total header size on disk, including any metadata JSON payload.
    pub fn header_size(&self) -> u64 {
        match self {
            Header::V1(_) => HEADER_SIZE_V1,
            Header::V2 { metadata, .. } => HEADER_FIXED_PREFIX + 4 + 20 + metadata.len() as u64,
            Header::V3Ultimate { metadata, .. } => {
                HEADER_FIXED_PREFIX + 4 + 20 + metadata.len() as u64
            }
            Header::Stable(_) => HEADER_SIZE_STABLE,
        }
    }

    /// Parse a header of any revision from the start of a container buffer.
    pub fn parse(buf: &[u8]) -> Result<Self, TzpError> {
        if buf.len() < HEADER_FIXED_PREFIX as usize {
            return Err(TzpError::InvalidFormat("buffer shorter than any header".into()));
        }
        let prefix = CommonPrefix::parse(buf)?;
        match (prefix.magic, prefix.version) {
            (MAGIC_V1, VERSION_V1) => {
                let _reserved = take(buf, 32, 20)?;
                Ok(Header::V1(prefix))
            }
            (MAGIC_V2, VERSION_V2) => {
                let len_bytes = take(buf, 32, 4)?;
                let metadata_len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
                let _reserved = take(buf, 36, 20)?;
                let metadata = take(buf, 56, metadata_len)?.to_vec();
                Ok(Header::V2 { prefix, metadata })
            }
            (MAGIC_V3_ULTIMATE, VERSION_V3_ULTIMATE) => {
                let len_bytes = take(buf, 32, 4)?;
                let metadata_len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
                let _reserved = take(buf, 36, 20)?;
                let metadata = take(buf, 56, metadata_len)?.to_vec();
                Ok(Header::V3Ultimate { prefix, metadata })
            }
            (MAGIC_V3_STABLE, VERSION_V3_STABLE) => {
                let _reserved = take(buf, 32, 16)?;
                Ok(Header::Stable(prefix))
            }
            (magic, version) => Err(TzpError::InvalidFormat(format!(
                "unrecognized (magic=0x{:08x}, version=0x{:04x})",
                magic, version
            ))),
        }
    }
}

/// Writes the canonical 48-byte v3.1 Stable header.
pub fn write_stable_header(prefix: &CommonPrefix) -> [u8; HEADER_SIZE_STABLE as usize] {
    let mut buf = Vec::with_capacity(HEADER_SIZE_STABLE as usize);
    prefix.write(&mut buf);
    buf.extend_from_slice(&[0u8; 16]);
    buf.try_into().expect("exactly HEADER_SIZE_STABLE bytes")
}

/// One block-table entry, normalized across revisions. `content_type` and
/// `compression_potential` are only ever populated when the source entry
/// carried them (v2, v3 Ultimate); the Stable writer never needs them since
/// it re-derives content type freshly on decode-time inspection, not from
/// the wire.
#[derive(Debug, Clone, Default)]
pub struct BlockEntry {
    pub payload_offset: u64,
    pub compressed_size: u32,
    pub original_size: u32,
    pub algorithm_id: u8,
    pub revision_byte: u8,
    pub crc32: u32,
    pub content_type: Option<u8>,
    pub compression_potential: Option<u8>,
}

impl BlockEntry {
    pub fn to_stable_bytes(&self) -> [u8; ENTRY_SIZE_STABLE as usize] {
        let mut buf = [0u8; ENTRY_SIZE_STABLE as usize];
        buf[0..8].copy_from_slice(&self.payload_offset.to_le_bytes());
        buf[8..12].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.original_size.to_le_bytes());
        buf[16] = self.algorithm_id;
        buf[17] = 0; // block_flags_low: reserved 0 in stable (spec §6)
        buf[18..22].copy_from_slice(&self.crc32.to_le_bytes());
        // buf[22..24] reserved, stays zero
        buf
    }

    fn parse_base(buf: &[u8]) -> Result<(u64, u32, u32, u8, u8, u32), TzpError> {
        let b = take(buf, 0, 22)?;
        Ok((
            u64::from_le_bytes(b[0..8].try_into().unwrap()),
            u32::from_le_bytes(b[8..12].try_into().unwrap()),
            u32::from_le_bytes(b[12..16].try_into().unwrap()),
            b[16],
            b[17],
            u32::from_le_bytes(b[18..22].try_into().unwrap()),
        ))
    }

    pub fn parse_v1(buf: &[u8]) -> Result<Self, TzpError> {
        let (payload_offset, compressed_size, original_size, algorithm_id, revision_byte, crc32) =
            Self::parse_base(buf)?;
        Ok(Self {
            payload_offset,
            compressed_size,
            original_size,
            algorithm_id,
            revision_byte,
            crc32,
            content_type: None,
            compression_potential: None,
        })
    }

    pub fn parse_v2(buf: &[u8]) -> Result<Self, TzpError> {
        let (payload_offset, compressed_size, original_size, algorithm_id, revision_byte, crc32) =
            Self::parse_base(buf)?;
        let trailing = take(buf, 22, 2)?;
        Ok(Self {
            payload_offset,
            compressed_size,
            original_size,
            algorithm_id,
            revision_byte,
            crc32,
            content_type: Some(trailing[0]),
            compression_potential: None,
        })
    }

    pub fn parse_v3_ultimate(buf: &[u8]) -> Result<Self, TzpError> {
        let (payload_offset, compressed_size, original_size, algorithm_id, revision_byte, crc32) =
            Self::parse_base(buf)?;
        let trailing = take(buf, 22, 4)?;
        Ok(Self {
            payload_offset,
            compressed_size,
            original_size,
            algorithm_id,
            revision_byte,
            crc32,
            content_type: Some(trailing[0]),
            compression_potential: Some(trailing[1]),
        })
    }

    pub fn parse_stable(buf: &[u8]) -> Result<Self, TzpError> {
        let (payload_offset, compressed_size, original_size, algorithm_id, revision_byte, crc32) =
            Self::parse_base(buf)?;
        let _reserved = take(buf, 22, 2)?;
        Ok(Self {
            payload_offset,
            compressed_size,
            original_size,
            algorithm_id,
            revision_byte,
            crc32,
            content_type: None,
            compression_potential: None,
        })
    }

    /// Whether this entry (necessarily parsed from a v3 Ultimate table, the
    /// only revision this crate treats as carrying a meaningful flags byte)
    /// was preprocessed before compression.
    pub fn is_preprocessed(&self) -> bool {
        self.revision_byte & FLAG_PREPROCESSED != 0
    }
}
