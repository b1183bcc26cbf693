//! Content Analyzer (spec §4.B): entropy, pattern density, repetition
//! factor, content-type classification, compression potential, and
//! algorithm/block-size recommendations. Grounded on `tzp_ultimate.py`'s
//! `AdvancedContentDetector`, the richest of the three Python analyzers.

use std::collections::HashMap;

use tzp_codecs::AlgorithmId;

const ENTROPY_SAMPLE: usize = 64 * 1024;
const PATTERN_SAMPLE: usize = 16 * 1024;
const REPETITION_SAMPLE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Unknown,
    TextPlain,
    TextStructured,
    TextCode,
    Executable,
    BinaryData,
    AlreadyCompressed,
    Multimedia,
    Repetitive,
    Random,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Unknown => "unknown",
            ContentType::TextPlain => "text-plain",
            ContentType::TextStructured => "text-structured",
            ContentType::TextCode => "text-code",
            ContentType::Executable => "executable",
            ContentType::BinaryData => "binary-data",
            ContentType::AlreadyCompressed => "already-compressed",
            ContentType::Multimedia => "multimedia",
            ContentType::Repetitive => "repetitive",
            ContentType::Random => "random",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub entropy: f64,
    pub pattern_density: f64,
    pub repetition_factor: f64,
    pub content_type: ContentType,
    pub compression_potential: f64,
    pub recommended_algorithm: AlgorithmId,
    pub recommended_block_size: u32,
}

/// Known magic prefixes for already-compressed containers.
const COMPRESSED_MAGICS: &[&[u8]] = &[
    b"\x1f\x8b",         // gzip
    b"PK\x03\x04",       // zip
    b"BZh",              // bzip2
    b"\x28\xb5\x2f\xfd", // zstd
    b"\x04\x22\x4d\x18", // lz4 frame
    b"7z\xbc\xaf\x27\x1c",
];

const MULTIMEDIA_MAGICS: &[&[u8]] = &[
    b"\xff\xd8\xff", // JPEG
    b"\x89PNG\r\n\x1a\n",
    b"GIF8",
    b"RIFF",  // WAV/AVI
    b"\x00\x00\x00\x18ftyp", // MP4-ish (loose)
    b"ID3",   // MP3
];

const CODE_PATTERNS: &[&str] = &[
    "function", "class ", "import ", "def ", "#!/", "public ", "private ", "#include",
];

fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sample = &data[..data.len().min(ENTROPY_SAMPLE)];
    let mut counts = [0u64; 256];
    for &b in sample {
        counts[b as usize] += 1;
    }
    let len = sample.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn pattern_density(data: &[u8]) -> f64 {
    let sample = &data[..data.len().min(PATTERN_SAMPLE)];
    if sample.len() < 4 {
        return 0.0;
    }
    let mut counts: HashMap<[u8; 4], u32> = HashMap::new();
    let mut i = 0;
    while i + 4 <= sample.len() {
        let window: [u8; 4] = sample[i..i + 4].try_into().unwrap();
        *counts.entry(window).or_insert(0) += 1;
        i += 4;
    }
    let t = counts.len() as f64;
    let m = counts.values().copied().max().unwrap_or(0) as f64;
    if t == 0.0 {
        return 0.0;
    }
    (5.0 * (m - 1.0) / t).clamp(0.0, 1.0)
}

fn repetition_factor(data: &[u8]) -> f64 {
    let sample = &data[..data.len().min(REPETITION_SAMPLE)];
    if sample.len() < 8 {
        return 0.0;
    }
    let mut counts: HashMap<[u8; 8], u32> = HashMap::new();
    let mut i = 0;
    while i + 8 <= sample.len() {
        let window: [u8; 8] = sample[i..i + 8].try_into().unwrap();
        *counts.entry(window).or_insert(0) += 1;
        i += 8;
    }
    let t = counts.len() as f64;
    if t <= 1.0 {
        return 0.0;
    }
    let m = counts.values().copied().max().unwrap_or(0) as f64;
    (10.0 * (m - 1.0) / t).clamp(0.0, 1.0)
}

fn starts_with_any(data: &[u8], magics: &[&[u8]]) -> bool {
    magics.iter().any(|m| data.starts_with(m))
}

fn classify_content_type(data: &[u8], entropy: f64) -> ContentType {
    if entropy > 7.8 {
        return if starts_with_any(data, COMPRESSED_MAGICS) {
            ContentType::AlreadyCompressed
        } else {
            ContentType::Random
        };
    }

    if starts_with_any(data, MULTIMEDIA_MAGICS) {
        return ContentType::Multimedia;
    }

    if data.starts_with(b"MZ") || data.starts_with(b"\x7fELF") || data.starts_with(b"\xfe\xed\xfa")
    {
        return ContentType::Executable;
    }

    let head = &data[..data.len().min(1024)];
    if let Ok(text) = std::str::from_utf8(head) {
        let control_count = text
            .chars()
            .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
            .count();
        let control_ratio = control_count as f64 / text.chars().count().max(1) as f64;
        if control_ratio < 0.05 {
            let trimmed = text.trim_start();
            let colon_count = text.matches(':').count() as f64;
            let newline_count = text.matches('\n').count().max(1) as f64;
            let comma_count = text.matches(',').count() as f64;
            let looks_structured = trimmed.starts_with('{')
                || trimmed.starts_with('[')
                || trimmed.starts_with("<?xml")
                || trimmed.starts_with('<')
                || (colon_count / newline_count) > 0.2
                || comma_count > 2.0 * newline_count;
            if looks_structured {
                return ContentType::TextStructured;
            }
            let code_hits = CODE_PATTERNS.iter().filter(|p| text.contains(**p)).count();
            if code_hits >= 2 {
                return ContentType::TextCode;
            }
            return ContentType::TextPlain;
        }
    }

    if entropy < 3.0 {
        return ContentType::Repetitive;
    }

    ContentType::BinaryData
}

fn compression_potential(entropy: f64, density: f64, repetition: f64) -> f64 {
    let score = 0.5 * ((8.0 - entropy) / 8.0) + 0.3 * density + 0.2 * repetition;
    score.clamp(0.0, 1.0)
}

fn recommend_algorithm(content_type: ContentType, potential: f64, size: usize) -> AlgorithmId {
    if size < 64 * 1024 {
        return AlgorithmId::Lz4Fast;
    }
    match content_type {
        ContentType::AlreadyCompressed | ContentType::Random | ContentType::Multimedia => {
            AlgorithmId::Uncompressed
        }
        ContentType::Repetitive => AlgorithmId::Hybrid,
        _ if potential > 0.8 => AlgorithmId::Hybrid,
        ContentType::TextStructured => AlgorithmId::Zstd22,
        ContentType::TextCode | ContentType::Executable => AlgorithmId::Zstd6,
        ContentType::TextPlain => AlgorithmId::Lz4Fast,
        ContentType::BinaryData => AlgorithmId::Adaptive,
        ContentType::Unknown => AlgorithmId::Adaptive,
    }
}

fn recommend_block_size(content_type: ContentType, density: f64, input_size: usize) -> u32 {
    const MIB: u32 = 1024 * 1024;
    if input_size < MIB as usize {
        return (input_size as u32).min(256 * 1024);
    }
    if matches!(content_type, ContentType::Repetitive) || density > 0.7 {
        return 16 * MIB;
    }
    if matches!(content_type, ContentType::TextStructured) {
        return 4 * MIB;
    }
    4 * MIB
}

/// Runs the full analysis over one buffer. `input_size` is the size of the
/// whole file this buffer came from, used only for the block-size
/// recommendation — a per-block analysis still reasons about the file as a
/// whole for that one heuristic.
pub fn analyze(data: &[u8], input_size: usize) -> Analysis {
    let entropy = shannon_entropy(data);
    let density = pattern_density(data);
    let repetition = repetition_factor(data);
    let content_type = classify_content_type(data, entropy);
    let potential = compression_potential(entropy, density, repetition);
    let recommended_algorithm = recommend_algorithm(content_type, potential, data.len());
    let recommended_block_size = recommend_block_size(content_type, density, input_size);

    Analysis {
        entropy,
        pattern_density: density,
        repetition_factor: repetition,
        content_type,
        compression_potential: potential,
        recommended_algorithm,
        recommended_block_size,
    }
}
