use flate2::write::DeflateEncoder;
use flate2::Compression;
use miniflate::Decompressor;
use std::io::Write;

fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn roundtrip(pattern: &[u8]) {
    let mut decompressor = Decompressor::new();
    let compressed = deflate(pattern, 6);
    let decompressed = decompressor
        .decompress_deflate(&compressed, pattern.len())
        .unwrap();
    assert_eq!(decompressed, pattern);
}

#[test]
fn test_offset_1_run() {
    // A single repeated byte compresses to distance-1 matches, the
    // fully overlapping case
    let pattern = vec![b'a'; 10000];
    roundtrip(&pattern);
}

#[test]
fn test_offset_3_pattern() {
    // Pattern 'ABC' repeated. Offset 3.
    let pattern: Vec<u8> = b"ABC".iter().cloned().cycle().take(1000).collect();
    roundtrip(&pattern);
}

#[test]
fn test_offset_5_pattern() {
    // Pattern 'ABCDE' repeated. Offset 5.
    let pattern: Vec<u8> = b"ABCDE".iter().cloned().cycle().take(1000).collect();
    roundtrip(&pattern);
}

#[test]
fn test_offset_8_pattern() {
    // Pattern 'ABCDEFGH' repeated. Offset 8.
    let pattern: Vec<u8> = b"ABCDEFGH".iter().cloned().cycle().take(1000).collect();
    roundtrip(&pattern);
}

#[test]
fn test_offset_13_pattern() {
    // Pattern length 13. Offset 13.
    let pattern: Vec<u8> = b"ABCDEFGHIJKLM"
        .iter()
        .cloned()
        .cycle()
        .take(1000)
        .collect();
    roundtrip(&pattern);
}

#[test]
fn test_offset_17_pattern() {
    // Pattern length 17. Offset 17.
    let pattern: Vec<u8> = b"ABCDEFGHIJKLMN123"
        .iter()
        .cloned()
        .cycle()
        .take(10000)
        .collect();
    roundtrip(&pattern);
}

#[test]
fn test_offset_14_large() {
    // 100 KB of repeated pattern. Offset 14.
    let pattern_len = 100 * 1024;
    let pattern: Vec<u8> = b"ABCDEFGHIJKLMN"
        .iter()
        .cloned()
        .cycle()
        .take(pattern_len)
        .collect();
    roundtrip(&pattern);
}

#[test]
fn test_long_range_matches() {
    // Two copies of a 40 KB slab, separated far enough to need large
    // distance codes
    let mut data: Vec<u8> = (0..40_000u32).map(|i| (i * 31 % 253) as u8).collect();
    let copy = data.clone();
    data.extend_from_slice(&copy);

    for level in [1, 6, 9] {
        let mut decompressor = Decompressor::new();
        let compressed = deflate(&data, level);
        let decompressed = decompressor
            .decompress_deflate(&compressed, data.len())
            .unwrap();
        assert_eq!(decompressed, data, "mismatch at level {}", level);
    }
}
