//! End-to-end round-trip coverage across profiles, partitioning modes,
//! thread counts, and legacy container revisions. Grounded on the teacher's
//! integration test style: deterministic LCG byte generators and
//! `std::env::temp_dir` scratch files, kept, adapted to this format's
//! encode/decode/inspect surface instead of random-access reads.

use tzp_core::format::{self, BlockEntry, CommonPrefix, FLAG_OPTIMIZED};
use tzp_core::profile::Profile;
use tzp_core::writer::EncodeOptions;
use tzp_core::{decode, decode_file, encode, encode_file, inspect};

fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tzp_test_{}_{}.tzp", name, std::process::id()))
}

fn opts(profile: Profile) -> EncodeOptions {
    EncodeOptions {
        profile,
        ..Default::default()
    }
}

// ── Universal properties (spec §8) ──────────────────────────────────────────

#[test]
fn roundtrip_identity_across_profiles() {
    let profiles = [
        Profile::Lightning,
        Profile::Fast,
        Profile::Balanced,
        Profile::High,
        Profile::Max,
    ];
    let data = compressible_bytes(4 * 1024 * 1024 + 1234);
    for profile in profiles {
        let (container, _) = encode(&data, &opts(profile)).unwrap();
        let (decoded, _) = decode(&container).unwrap();
        assert_eq!(decoded, data, "round-trip failed for profile {:?}", profile);
    }
}

#[test]
fn roundtrip_identity_on_random_bytes() {
    let data = pseudo_random_bytes(3 * 1024 * 1024 + 17, 0xC0FF_EE00);
    let (container, _) = encode(&data, &opts(Profile::High)).unwrap();
    let (decoded, _) = decode(&container).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn layout_invariant_holds() {
    let data: Vec<u8> = (0..3 * 1024 * 1024u32).map(|i| (i % 199) as u8).collect();
    let result = tzp_core::writer::encode(
        &data,
        &EncodeOptions {
            block_size: Some(1024 * 1024),
            ..Default::default()
        },
    )
    .unwrap();
    let parsed = tzp_core::reader::parse(&result.container).unwrap();

    assert_eq!(parsed.entries[0].payload_offset, 0);
    let mut running = 0u64;
    for entry in &parsed.entries {
        assert_eq!(entry.payload_offset, running);
        running += entry.compressed_size as u64;
    }
    let total_original: u64 = parsed.entries.iter().map(|e| e.original_size as u64).sum();
    assert_eq!(total_original, parsed.header.prefix().uncompressed_size);
    assert_eq!(
        parsed.header.entry_size() * parsed.entries.len() as u64,
        format::ENTRY_SIZE_STABLE * parsed.entries.len() as u64
    );
}

#[test]
fn determinism_across_thread_counts() {
    let data = compressible_bytes(6 * 1024 * 1024 + 99);
    let one = encode(
        &data,
        &EncodeOptions {
            threads: Some(1),
            ..Default::default()
        },
    )
    .unwrap()
    .0;
    let many = encode(
        &data,
        &EncodeOptions {
            threads: Some(32),
            ..Default::default()
        },
    )
    .unwrap()
    .0;
    assert_eq!(one, many, "thread count must not leak into output bytes");
}

#[test]
fn no_expansion_guarantee() {
    let data = pseudo_random_bytes(2 * 1024 * 1024, 0x1357_9BDF);
    let result = tzp_core::writer::encode(&data, &EncodeOptions::default()).unwrap();
    let parsed = tzp_core::reader::parse(&result.container).unwrap();
    for entry in &parsed.entries {
        assert!(entry.compressed_size <= entry.original_size);
    }
}

// ── Boundary cases (spec §8) ─────────────────────────────────────────────────

#[test]
fn empty_input_header_only() {
    let (container, stats) = encode(&[], &opts(Profile::Balanced)).unwrap();
    assert_eq!(container.len(), format::HEADER_SIZE_STABLE as usize);
    assert_eq!(stats.block_count, 0);

    let (decoded, _) = decode(&container).unwrap();
    assert!(decoded.is_empty());

    let inspection = inspect(&container).unwrap();
    assert_eq!(inspection.uncompressed_size, 0);
    assert_eq!(inspection.block_count, 0);
    assert_eq!(inspection.base_block_size, format::DEFAULT_BLOCK_SIZE);
    assert_eq!(inspection.flags, FLAG_OPTIMIZED);
}

#[test]
fn single_byte_input_one_block() {
    let (container, stats) = encode(&[0x7fu8], &opts(Profile::Balanced)).unwrap();
    assert_eq!(stats.block_count, 1);
    let (decoded, _) = decode(&container).unwrap();
    assert_eq!(decoded, vec![0x7fu8]);
}

#[test]
fn exact_block_size_boundary() {
    let block_size = 4096u32;
    let one_block = vec![0x11u8; block_size as usize];
    let result = tzp_core::writer::encode(
        &one_block,
        &EncodeOptions {
            block_size: Some(block_size),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.blocks.len(), 1);

    let mut two_blocks = one_block.clone();
    two_blocks.push(0x22);
    let result = tzp_core::writer::encode(
        &two_blocks,
        &EncodeOptions {
            block_size: Some(block_size),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.blocks.len(), 2);
}

#[test]
fn high_entropy_input_stored_uncompressed() {
    let data = pseudo_random_bytes(4 * 1024 * 1024, 0xABCD_EF01);
    let result = tzp_core::writer::encode(&data, &EncodeOptions::default()).unwrap();
    for block in &result.blocks {
        assert_eq!(block.algorithm_id.as_u8(), 0);
    }
}

#[test]
fn repetitive_input_compresses_aggressively() {
    let data = vec![0x41u8; 16 * 1024 * 1024];
    let (container, stats) = encode(&data, &opts(Profile::Max)).unwrap();
    assert!((stats.compressed_size as f64 / stats.original_size as f64) < 0.01);
    let (decoded, _) = decode(&container).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn gzip_magic_stored_uncompressed() {
    let mut data = vec![0x1f, 0x8b, 0x08, 0x00];
    data.extend(pseudo_random_bytes(128 * 1024, 0x2222));
    let result = tzp_core::writer::encode(&data, &EncodeOptions::default()).unwrap();
    assert_eq!(result.blocks[0].algorithm_id.as_u8(), 0);
}

// ── Concrete end-to-end scenarios (spec §8) ─────────────────────────────────

#[test]
fn scenario_1_empty_string_balanced() {
    let (container, _) = encode(&[], &opts(Profile::Balanced)).unwrap();
    let inspection = inspect(&container).unwrap();
    assert_eq!(inspection.version, format::VERSION_V3_STABLE);
    assert_eq!(inspection.uncompressed_size, 0);
    assert_eq!(inspection.block_count, 0);
    assert_eq!(inspection.base_block_size, 4 * 1024 * 1024);
    assert_eq!(inspection.flags, 1);
    assert_eq!(container.len(), 48);
}

#[test]
fn scenario_2_four_mib_of_a_max_profile() {
    let data = vec![0x41u8; 4 * 1024 * 1024];
    let result = tzp_core::writer::encode(
        &data,
        &EncodeOptions {
            profile: Profile::Max,
            block_size: Some(4 * 1024 * 1024),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(result.blocks.len(), 1);
    assert_eq!(result.blocks[0].original_size, 4 * 1024 * 1024);
    assert_eq!(result.blocks[0].algorithm_id.as_u8(), 6);
    assert!(result.blocks[0].compressed.len() < 1024);
    assert_eq!(result.blocks[0].crc32, crc32fast::hash(&data));
}

#[test]
fn scenario_3_ten_mib_random_high_profile() {
    let data = pseudo_random_bytes(10 * 1024 * 1024, 0x5050_5050);
    let result = tzp_core::writer::encode(&data, &opts(Profile::High)).unwrap();
    for block in &result.blocks {
        assert_eq!(block.algorithm_id.as_u8(), 0);
        assert_eq!(block.compressed.len(), block.original_size as usize);
    }
    let total_payload: usize = result.blocks.iter().map(|b| b.compressed.len()).sum();
    assert_eq!(total_payload, data.len());
}

#[test]
fn scenario_4_structured_json_text() {
    let unit = br#"{"k":1}"#;
    let mut data = Vec::new();
    while data.len() < 1024 * 1024 {
        data.extend_from_slice(unit);
    }
    let (container, stats) = encode(&data, &opts(Profile::Balanced)).unwrap();
    assert!(stats.ratio() < 0.1);
    let (decoded, _) = decode(&container).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn scenario_5_three_block_file_deterministic() {
    let mut data = Vec::new();
    data.extend(pseudo_random_bytes(1024 * 1024, 1));
    data.extend(compressible_bytes(1024 * 1024));
    data.extend(vec![0x99u8; 1024 * 1024]);

    let options = EncodeOptions {
        block_size: Some(1024 * 1024),
        threads: Some(4),
        ..Default::default()
    };
    let result = tzp_core::writer::encode(&data, &options).unwrap();
    assert_eq!(result.blocks.len(), 3);

    let run_a = encode(&data, &options).unwrap().0;
    let run_b = encode(&data, &options).unwrap().0;
    assert_eq!(run_a, run_b, "re-encoding must be byte-identical");
}

#[test]
fn scenario_6_decodes_a_legacy_v2_file() {
    // Hand-construct a minimal v2 container: 32-byte fixed prefix + 4-byte
    // metadata length + 20-byte reserved + empty metadata, one uncompressed
    // block.
    let payload = b"legacy v2 plaintext payload".to_vec();
    let crc = crc32fast::hash(&payload);

    let prefix = CommonPrefix {
        magic: format::MAGIC_V2,
        version: format::VERSION_V2,
        flags: 0,
        uncompressed_size: payload.len() as u64,
        block_count: 1,
        base_block_size: payload.len() as u32,
        file_checksum: [0u8; 8],
    };

    let mut buf = Vec::new();
    buf.extend_from_slice(&prefix.magic.to_le_bytes());
    buf.extend_from_slice(&prefix.version.to_le_bytes());
    buf.extend_from_slice(&prefix.flags.to_le_bytes());
    buf.extend_from_slice(&prefix.uncompressed_size.to_le_bytes());
    buf.extend_from_slice(&prefix.block_count.to_le_bytes());
    buf.extend_from_slice(&prefix.base_block_size.to_le_bytes());
    buf.extend_from_slice(&prefix.file_checksum);
    buf.extend_from_slice(&0u32.to_le_bytes()); // metadata_len = 0
    buf.extend_from_slice(&[0u8; 20]); // reserved

    let entry = BlockEntry {
        payload_offset: 0,
        compressed_size: payload.len() as u32,
        original_size: payload.len() as u32,
        algorithm_id: 0, // uncompressed
        revision_byte: 0,
        crc32: crc,
        content_type: Some(0),
        compression_potential: None,
    };
    buf.extend_from_slice(&entry.payload_offset.to_le_bytes());
    buf.extend_from_slice(&entry.compressed_size.to_le_bytes());
    buf.extend_from_slice(&entry.original_size.to_le_bytes());
    buf.push(entry.algorithm_id);
    buf.push(entry.revision_byte);
    buf.extend_from_slice(&entry.crc32.to_le_bytes());
    buf.push(entry.content_type.unwrap());
    buf.push(0); // reserved

    buf.extend_from_slice(&payload);

    let (decoded, _) = decode(&buf).unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn scenario_7_decodes_a_legacy_v1_file() {
    // Hand-construct a minimal v1 container: 52-byte header (32-byte fixed
    // prefix + 20-byte reserved), one uncompressed block whose algorithm_id
    // is the v1-era 0xFF marker, not the canonical catalogue's 0. The entry's
    // second byte holds v1's `compression_level` (6, a routine value for a
    // Zstd-6 block per the historical encoder) rather than a flags bitmask —
    // `6 & FLAG_PREPROCESSED` is nonzero, so this also checks that a v1
    // decode never runs preprocessing reversal on that collision.
    let payload = b"legacy v1 plaintext payload, unpreprocessed".to_vec();
    let crc = crc32fast::hash(&payload);

    let prefix = CommonPrefix {
        magic: format::MAGIC_V1,
        version: format::VERSION_V1,
        flags: 0,
        uncompressed_size: payload.len() as u64,
        block_count: 1,
        base_block_size: payload.len() as u32,
        file_checksum: [0u8; 8],
    };

    let mut buf = Vec::new();
    buf.extend_from_slice(&prefix.magic.to_le_bytes());
    buf.extend_from_slice(&prefix.version.to_le_bytes());
    buf.extend_from_slice(&prefix.flags.to_le_bytes());
    buf.extend_from_slice(&prefix.uncompressed_size.to_le_bytes());
    buf.extend_from_slice(&prefix.block_count.to_le_bytes());
    buf.extend_from_slice(&prefix.base_block_size.to_le_bytes());
    buf.extend_from_slice(&prefix.file_checksum);
    buf.extend_from_slice(&[0u8; 20]); // reserved

    let entry = BlockEntry {
        payload_offset: 0,
        compressed_size: payload.len() as u32,
        original_size: payload.len() as u32,
        algorithm_id: 0xFF, // v1 uncompressed marker
        revision_byte: 6,   // v1 compression_level, not a flags byte
        crc32: crc,
        content_type: None,
        compression_potential: None,
    };
    buf.extend_from_slice(&entry.payload_offset.to_le_bytes());
    buf.extend_from_slice(&entry.compressed_size.to_le_bytes());
    buf.extend_from_slice(&entry.original_size.to_le_bytes());
    buf.push(entry.algorithm_id);
    buf.push(entry.revision_byte);
    buf.extend_from_slice(&entry.crc32.to_le_bytes());

    buf.extend_from_slice(&payload);

    let (decoded, _) = decode(&buf).unwrap();
    assert_eq!(decoded, payload);
}

// ── File round-trip via encode_file/decode_file ─────────────────────────────

#[test]
fn file_roundtrip() {
    let data = compressible_bytes(2 * 1024 * 1024 + 500);
    let src = temp_path("src_in");
    let container_path = temp_path("container");
    let dst = temp_path("dst_out");

    std::fs::write(&src, &data).unwrap();
    encode_file(&src, &container_path, &opts(Profile::Balanced)).unwrap();
    decode_file(&container_path, &dst, None).unwrap();

    let roundtripped = std::fs::read(&dst).unwrap();
    assert_eq!(roundtripped, data);

    let _ = std::fs::remove_file(&src);
    let _ = std::fs::remove_file(&container_path);
    let _ = std::fs::remove_file(&dst);
}

#[test]
fn corrupted_block_crc_is_rejected() {
    let data = compressible_bytes(1024 * 1024);
    let (mut container, _) = encode(&data, &opts(Profile::Balanced)).unwrap();
    // Flip a byte deep in the payload, past header + one block-table entry.
    let corrupt_at = (format::HEADER_SIZE_STABLE + format::ENTRY_SIZE_STABLE + 8) as usize;
    container[corrupt_at] ^= 0xFF;
    let result = decode(&container);
    assert!(result.is_err());
}
