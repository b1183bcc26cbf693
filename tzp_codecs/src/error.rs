use thiserror::Error;

/// Failures from the underlying LZ4/Zstd libraries, or from this crate's own
/// dispatch over the algorithm catalogue.
///
/// A `CodecError` raised while encoding never reaches a caller: the block
/// pipeline catches it and degrades that one block to uncompressed. Raised
/// while decoding, it is fatal and gets wrapped into `TzpError::Codec` by
/// `tzp_core`.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("lz4 failure: {0}")]
    Lz4(String),
    #[error("zstd failure: {0}")]
    Zstd(#[from] std::io::Error),
    #[error("unknown algorithm id {0}")]
    UnknownAlgorithm(u8),
    #[error("hybrid cascade failure: {0}")]
    Hybrid(String),
}
