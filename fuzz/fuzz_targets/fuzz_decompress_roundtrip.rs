#![no_main]
use libfuzzer_sys::fuzz_target;

// Compress with an independent encoder, then check this crate's decoder
// reproduces the original bytes exactly.
fuzz_target!(|data: &[u8]| {
    let mut compressed = Vec::new();
    let result = if data.len() <= 0xFFFF {
        lz_fear::raw::compress2(data, 0, &mut lz_fear::raw::U16Table::default(), &mut compressed)
    } else {
        lz_fear::raw::compress2(data, 0, &mut lz_fear::raw::U32Table::default(), &mut compressed)
    };
    if result.is_err() {
        return;
    }

    let mut out = vec![0u8; data.len()];
    let n = lz4_flex::block::decompress_safe(&compressed, &mut out).unwrap();
    assert_eq!(n, data.len());
    assert_eq!(&out[..], data);

    let mut out_fast = vec![0u8; data.len()];
    let n = unsafe { lz4_flex::block::decompress_fast(&compressed, &mut out_fast).unwrap() };
    assert_eq!(n, compressed.len());
    assert_eq!(&out_fast[..], data);
});
