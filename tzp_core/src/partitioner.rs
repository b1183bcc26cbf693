//! Partitioner (spec §4.D): splits input into ordered blocks, either fixed
//! or content-adaptive. Grounded on `tzp_encoder.py`'s `split_into_blocks`
//! (fixed) and `tzp_ultimate.py`'s `_find_natural_split_point` (adaptive).

const NATURAL_SPLIT_WINDOW: usize = 1024;

/// One `(start, end)` span of the input, in ascending order.
pub type Span = (usize, usize);

/// Fixed-size partitioning: contiguous `block_size`-byte slices, the last
/// possibly shorter.
pub fn partition_fixed(len: usize, block_size: u32) -> Vec<Span> {
    if len == 0 {
        return Vec::new();
    }
    let block_size = block_size.max(1) as usize;
    let mut spans = Vec::with_capacity(len / block_size + 1);
    let mut start = 0;
    while start < len {
        let end = (start + block_size).min(len);
        spans.push((start, end));
        start = end;
    }
    spans
}

/// Adaptive partitioning: for each candidate cut at `start + block_size`,
/// scan backwards up to 1024 bytes for the last `\n`, then the last `0x00`,
/// falling back to the unadjusted boundary if neither is found. Keeps
/// natural record boundaries (lines, NUL-terminated records) intact.
pub fn partition_adaptive(data: &[u8], block_size: u32) -> Vec<Span> {
    if data.is_empty() {
        return Vec::new();
    }
    let block_size = block_size.max(1) as usize;
    let len = data.len();
    let mut spans = Vec::new();
    let mut start = 0;
    while start < len {
        let candidate_end = (start + block_size).min(len);
        let end = if candidate_end >= len {
            len
        } else {
            find_natural_split_point(data, start, candidate_end)
        };
        spans.push((start, end));
        start = end;
    }
    spans
}

fn find_natural_split_point(data: &[u8], start: usize, candidate_end: usize) -> usize {
    let window_start = candidate_end.saturating_sub(NATURAL_SPLIT_WINDOW).max(start);
    let window = &data[window_start..candidate_end];

    if let Some(rel) = window.iter().rposition(|&b| b == b'\n') {
        return window_start + rel + 1;
    }
    if let Some(rel) = window.iter().rposition(|&b| b == 0x00) {
        return window_start + rel + 1;
    }
    candidate_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_partitioning_covers_whole_input() {
        let spans = partition_fixed(1025, 256);
        assert_eq!(spans, vec![(0, 256), (256, 512), (512, 768), (768, 1024), (1024, 1025)]);
    }

    #[test]
    fn fixed_partitioning_empty_input() {
        assert_eq!(partition_fixed(0, 256), Vec::new());
    }

    #[test]
    fn fixed_partitioning_exact_multiple() {
        let spans = partition_fixed(512, 256);
        assert_eq!(spans, vec![(0, 256), (256, 512)]);
    }

    #[test]
    fn adaptive_partitioning_prefers_newline_boundary() {
        let mut data = vec![b'x'; 100];
        data[90] = b'\n';
        data.extend(vec![b'y'; 100]);
        let spans = partition_adaptive(&data, 95);
        assert_eq!(spans[0].1, 91); // cuts right after the newline
    }

    #[test]
    fn adaptive_partitioning_falls_back_to_candidate_end() {
        let data = vec![b'x'; 500]; // no \n or \0 anywhere
        let spans = partition_adaptive(&data, 200);
        assert_eq!(spans[0], (0, 200));
    }

    #[test]
    fn adaptive_partitioning_never_extends_past_input() {
        let data = vec![b'z'; 50];
        let spans = partition_adaptive(&data, 256);
        assert_eq!(spans, vec![(0, 50)]);
    }
}
