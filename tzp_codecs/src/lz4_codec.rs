use std::io::{Read, Write};

use crate::error::CodecError;

/// LZ4 block format, explicit size on decode (the size comes from the block
/// table's `original_size`, so no length prefix needs to travel on the wire).
/// Used as the first stage of the hybrid cascade, where the intermediate
/// buffer's final size is already known from the enclosing block's entry.
pub fn compress_block_sized(data: &[u8]) -> Vec<u8> {
    lz4_flex::block::compress(data)
}

pub fn decompress_block_sized(data: &[u8], original_size: usize) -> Result<Vec<u8>, CodecError> {
    lz4_flex::block::decompress(data, original_size).map_err(|e| CodecError::Lz4(e.to_string()))
}

/// LZ4 block format with a self-describing size prefix. This is the shape
/// v1/v2 containers carry for their LZ4 blocks.
pub fn decompress_block_prefixed(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    lz4_flex::block::decompress_size_prepended(data).map_err(|e| CodecError::Lz4(e.to_string()))
}

/// LZ4 frame format: self-delimiting, carries its own content size. This is
/// what the v3.1 Stable writer emits for `Lz4Fast`/`Lz4Hc` blocks.
///
/// `lz4_flex` has no distinct high-compression mode the way the real LZ4
/// library does — `Lz4Fast` and `Lz4Hc` therefore compress identically here
/// (noted in DESIGN.md as a dependency-stack limitation, not a format one).
pub fn compress_frame(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
    encoder
        .write_all(data)
        .map_err(|e| CodecError::Lz4(e.to_string()))?;
    encoder.finish().map_err(|e| CodecError::Lz4(e.to_string()))
}

pub fn decompress_frame(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut decoder = lz4_flex::frame::FrameDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CodecError::Lz4(e.to_string()))?;
    Ok(out)
}
