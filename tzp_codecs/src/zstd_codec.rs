use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::CodecError;

/// Pool of Zstd compressor instances keyed by level.
///
/// Constructing a `zstd::bulk::Compressor` is cheap for low levels but
/// expensive at level 22 (spec §9, "Encoder caching" design note), so each
/// level's compressor is built once, on first use, and reused for the
/// lifetime of the pool. A `Mutex` serializes access per slot rather than
/// per pool — concurrent encoders at different levels don't block each
/// other beyond the single lock acquisition.
pub struct ZstdPool {
    compressors: Mutex<HashMap<i32, zstd::bulk::Compressor<'static>>>,
}

impl ZstdPool {
    pub fn new() -> Self {
        Self {
            compressors: Mutex::new(HashMap::new()),
        }
    }

    pub fn compress(&self, level: i32, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut pool = self.compressors.lock().expect("zstd pool mutex poisoned");
        if !pool.contains_key(&level) {
            let compressor = zstd::bulk::Compressor::new(level)?;
            pool.insert(level, compressor);
        }
        let compressor = pool.get_mut(&level).expect("just inserted");
        compressor.compress(data).map_err(CodecError::from)
    }
}

impl Default for ZstdPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode with a known output size — the common case, since the block
/// table's `original_size` already tells us exactly how large the buffer
/// needs to be.
pub fn decompress_sized(data: &[u8], original_size: usize) -> Result<Vec<u8>, CodecError> {
    zstd::bulk::decompress(data, original_size).map_err(CodecError::from)
}

/// Decode relying on the Zstd frame's own embedded content size. Used for
/// the hybrid cascade's outer stage, where the intermediate (LZ4-compressed)
/// buffer's length isn't recorded anywhere in the block table.
pub fn decompress_self_describing(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    zstd::decode_all(data).map_err(CodecError::from)
}
