use crate::error::CodecError;

/// The fixed nine-member algorithm catalogue.
///
/// This is a closed tagged sum, not an open trait-object registry — every
/// variant is dispatched by a single `match` in [`crate::adapter::CodecAdapter`].
/// New codecs are not meant to be plugged in at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum AlgorithmId {
    Uncompressed = 0,
    Lz4Fast = 1,
    Lz4Hc = 2,
    Zstd1 = 3,
    Zstd6 = 4,
    Zstd15 = 5,
    Zstd22 = 6,
    Hybrid = 7,
    Adaptive = 8,
}

impl AlgorithmId {
    pub fn from_u8(v: u8) -> Result<Self, CodecError> {
        Ok(match v {
            0 => Self::Uncompressed,
            1 => Self::Lz4Fast,
            2 => Self::Lz4Hc,
            3 => Self::Zstd1,
            4 => Self::Zstd6,
            5 => Self::Zstd15,
            6 => Self::Zstd22,
            7 => Self::Hybrid,
            8 => Self::Adaptive,
            other => return Err(CodecError::UnknownAlgorithm(other)),
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Maps a v1-era algorithm byte (`{0x00 LZ4, 0x01 Zstd, 0xFF uncompressed}`)
    /// onto the canonical catalogue. v1's `compression_level` field (3 or 6)
    /// is not consulted: Zstd decode is level-agnostic (spec §4.A), so the
    /// historical level only ever mattered at encode time.
    pub fn from_v1_byte(v: u8) -> Result<Self, CodecError> {
        Ok(match v {
            0x00 => Self::Lz4Fast,
            0x01 => Self::Zstd6,
            0xFF => Self::Uncompressed,
            other => return Err(CodecError::UnknownAlgorithm(other)),
        })
    }

    /// The Zstd compression level this variant corresponds to, if any.
    pub fn zstd_level(self) -> Option<i32> {
        match self {
            Self::Zstd1 => Some(1),
            Self::Zstd6 => Some(6),
            Self::Zstd15 => Some(15),
            Self::Zstd22 => Some(22),
            _ => None,
        }
    }
}
