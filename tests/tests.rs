//! Integration tests for the block decoder's public entry points.
//!
//! Fixtures come from two independent encoders: the small test-only
//! encoder in `tests/common` (generates arbitrary-content blocks) and
//! `lz-fear`'s `compress2` (an independent LZ4 implementation, used here as
//! a cross-checking oracle rather than for ratio/speed comparisons).

mod common;

use common::encode_block;
use lz4_flex::block::{decompress_fast, decompress_safe, decompress_safe_partial};
use lz_fear::raw::{compress2, U16Table, U32Table};

fn compress_lz4_fear(input: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    if input.len() <= 0xFFFF {
        compress2(input, 0, &mut U16Table::default(), &mut buf).unwrap();
    } else {
        compress2(input, 0, &mut U32Table::default(), &mut buf).unwrap();
    }
    buf
}

fn assert_round_trips(original: &[u8]) {
    let encoded = encode_block(original);
    let mut out = vec![0u8; original.len()];
    let n = decompress_safe(&encoded, &mut out).unwrap();
    assert_eq!(n, original.len());
    assert_eq!(out, original);
}

fn assert_round_trips_via_fear(original: &[u8]) {
    let encoded = compress_lz4_fear(original);
    let mut out = vec![0u8; original.len()];
    let n = decompress_safe(&encoded, &mut out).unwrap();
    assert_eq!(n, original.len());
    assert_eq!(out, original);
}

#[test]
fn round_trip_empty() {
    assert_round_trips(b"");
}

#[test]
fn round_trip_short_strings() {
    for s in [
        "a",
        "hello",
        "to live or not to live",
        "There is nothing either good or bad, but thinking makes it so.",
        "aaaaaa",
        "aaaaaabcbcbcbc",
    ] {
        assert_round_trips(s.as_bytes());
    }
}

#[test]
fn round_trip_repetitive_text() {
    let text = "the quick brown fox jumps over the lazy dog. ".repeat(500);
    assert_round_trips(text.as_bytes());
}

#[test]
fn round_trip_binary_data() {
    let mut data = Vec::with_capacity(70_000);
    for n in 0..70_000u32 {
        data.push((n as u8).wrapping_mul(0xA5).wrapping_add(13));
    }
    assert_round_trips(&data);
}

#[test]
fn round_trip_against_lz_fear_oracle() {
    let text = include_str!("../src/block/decompress_safe.rs");
    assert_round_trips_via_fear(text.as_bytes());
    assert_round_trips_via_fear(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    assert_round_trips_via_fear(b"");
}

#[test]
fn decompress_safe_partial_returns_prefix_without_reading_tail() {
    let original: Vec<u8> = "the quick brown fox jumps over the lazy dog. "
        .repeat(50)
        .into_bytes();
    let encoded = encode_block(&original);
    let mut out = vec![0u8; original.len()];
    let n = decompress_safe_partial(&encoded, &mut out, 100).unwrap();
    assert_eq!(n, 100);
    assert_eq!(&out[..100], &original[..100]);
    assert!(out[100..].iter().all(|&b| b == 0));
}

#[test]
fn decompress_fast_reads_a_prefix_dictionary() {
    // Build one block whose output is split: the first half lives in a
    // "prefix" region, the second half is produced by a block that may
    // reference back into it, a prefix dictionary in miniature (well under
    // the real 64 KiB limit, which is fine: the contract only bounds the
    // *maximum* prefix, not a minimum).
    let prefix = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let suffix = b"abcdefghijklmnopqrstuvwxyz0123456789 plus some new tail bytes";

    let mut buf = vec![0u8; prefix.len() + suffix.len()];
    buf[..prefix.len()].copy_from_slice(prefix);

    let encoded = encode_block(suffix);
    let body = &mut buf[prefix.len()..];
    let n = unsafe { decompress_fast(&encoded, body).unwrap() };
    assert_eq!(n, encoded.len());
    assert_eq!(&buf[prefix.len()..], suffix);
}

#[test]
fn malformed_offset_errors_without_panicking() {
    // offset=10 with no dictionary and very little output written: must
    // error, not panic or read out of bounds.
    let token = (1u8 << 4) | 0u8;
    let input = [token, b'a', 10, 0];
    let mut out = [0u8; 5];
    assert!(decompress_safe(&input, &mut out).is_err());
}

#[test]
fn truncated_input_errors_without_panicking() {
    for cut in 0..4 {
        let original = b"abcabcabcabcabcabcabc";
        let mut encoded = encode_block(original);
        encoded.truncate(encoded.len().saturating_sub(cut + 1));
        let mut out = vec![0u8; original.len()];
        // Must never panic, regardless of whether it errors.
        let _ = decompress_safe(&encoded, &mut out);
    }
}
