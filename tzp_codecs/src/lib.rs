mod adapter;
mod algorithm;
mod error;
mod hybrid;
mod lz4_codec;
mod passthrough;
mod zstd_codec;

pub use adapter::CodecAdapter;
pub use algorithm::AlgorithmId;
pub use error::CodecError;
