use thiserror::Error;

/// The closed set of ways an encode or decode operation can fail (spec §7).
#[derive(Debug, Error)]
pub enum TzpError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("integrity error: {0}")]
    IntegrityError(String),

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unknown algorithm id {0}")]
    UnknownAlgorithm(u8),

    #[error("codec error: {0}")]
    Codec(#[from] tzp_codecs::CodecError),
}
