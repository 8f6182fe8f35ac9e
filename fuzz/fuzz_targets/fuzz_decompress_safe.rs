#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary input must never panic, never read or write out of bounds,
// regardless of how malformed it is.
fuzz_target!(|data: &[u8]| {
    let mut out = vec![0u8; data.len().min(1 << 20)];
    let _ = lz4_flex::block::decompress_safe(data, &mut out);
});
