/// Identity "codec": stores blocks verbatim.
///
/// Used for blocks the analyzer classifies as already-compressed, random,
/// or multimedia, and as the not-worth-compressing gate's fallback.
pub fn encode(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

pub fn decode(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}
