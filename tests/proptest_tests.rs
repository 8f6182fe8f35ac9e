//! Property-based tests for the block decoder.

mod common;

use common::encode_block;
use lz4_flex::block::{decompress_fast, decompress_safe, decompress_safe_partial};
use proptest::prelude::*;

proptest! {
    #[test]
    fn round_trips_arbitrary_bytes(data: Vec<u8>) {
        let encoded = encode_block(&data);
        let mut out = vec![0u8; data.len()];
        let n = decompress_safe(&encoded, &mut out).unwrap();
        prop_assert_eq!(n, data.len());
        prop_assert_eq!(&out, &data);
    }

    #[test]
    fn decompress_fast_round_trips_arbitrary_bytes(data: Vec<u8>) {
        let encoded = encode_block(&data);
        let mut out = vec![0u8; data.len()];
        let n = unsafe { decompress_fast(&encoded, &mut out).unwrap() };
        prop_assert_eq!(n, encoded.len());
        prop_assert_eq!(&out, &data);
    }

    /// A malformed block must never write past the output buffer it was
    /// given: guard it with a canary region and confirm the canary survives
    /// whether decoding succeeds or fails.
    #[test]
    fn never_writes_past_the_given_output(data: Vec<u8>, garbage: Vec<u8>, extra_cap in 0usize..64) {
        let encoded = encode_block(&data);
        let mut corrupted = encoded;
        // Splice in arbitrary bytes to produce a plausibly-still-parseable
        // but likely-invalid stream, without changing its length.
        for (i, b) in garbage.iter().enumerate().take(corrupted.len()) {
            corrupted[i] = *b;
        }

        let target_len = data.len();
        let mut buf = vec![0xAAu8; target_len + extra_cap];
        let (out, canary) = buf.split_at_mut(target_len);
        let canary_before = canary.to_vec();

        let _ = decompress_safe(&corrupted, out);
        prop_assert_eq!(canary.to_vec(), canary_before);
    }

    /// `decompress_safe_partial` never writes more than `target_output_size`
    /// bytes, even when the underlying buffer is larger.
    #[test]
    fn partial_respects_target_size(data: Vec<u8>, target in 0usize..256) {
        let encoded = encode_block(&data);
        let mut buf = vec![0xAAu8; data.len().max(target) + 32];
        let target = target.min(buf.len());
        let canary_start = target;
        let canary_before = buf[canary_start..].to_vec();

        if let Ok(n) = decompress_safe_partial(&encoded, &mut buf, target) {
            prop_assert!(n <= target);
            prop_assert_eq!(&buf[canary_start..], &canary_before[..]);
        }
    }
}
