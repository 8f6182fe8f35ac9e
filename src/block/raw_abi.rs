//! Historical C-ABI compatibility shim.
//!
//! The original LZ4 decoder API returns a plain `int`/`isize`: the number
//! of bytes produced (or consumed, for `decompress_fast`) on success, or a
//! negative sentinel `-(1 + bytes_consumed_so_far)` on failure. Existing
//! consumers written against that convention can't use a `Result`-returning
//! API directly; this module reproduces the sentinel encoding on top of the
//! `Result`-based core so such callers have a drop-in replacement, without
//! duplicating decode logic (the core already threads "bytes consumed so
//! far" out of every error path via `DecodeFailure`; these wrappers just
//! read it back out).

use crate::block::decompress_fast::decompress_fast_inner;
use crate::block::DecodeFailure;

#[cfg(feature = "safe-decode")]
use crate::block::decompress_safe::decompress_generic;
#[cfg(not(feature = "safe-decode"))]
use crate::block::decompress::decompress_generic;

#[inline]
fn encode(result: Result<usize, DecodeFailure>) -> isize {
    match result {
        Ok(n) => n as isize,
        Err(failure) => -(1 + failure.consumed as isize),
    }
}

/// `decompress_safe`, ABI-compatible with the reference's
/// `LZ4_decompress_safe`: returns the number of bytes written on success
/// (`>= 0`), or `-(1 + bytes_consumed)` on failure.
pub fn decompress_safe_raw(input: &[u8], output: &mut [u8]) -> isize {
    encode(decompress_generic::<false>(input, output))
}

/// `decompress_safe_partial`, ABI-compatible with the reference's
/// `LZ4_decompress_safe_partial`.
pub fn decompress_safe_partial_raw(
    input: &[u8],
    output: &mut [u8],
    target_output_size: usize,
) -> isize {
    let cap = target_output_size.min(output.len());
    encode(decompress_generic::<true>(input, &mut output[..cap]))
}

/// `decompress_fast`, ABI-compatible with the reference's
/// `LZ4_decompress_fast`: returns the number of input bytes consumed on
/// success, or `-(1 + bytes_consumed)` on failure.
///
/// # Safety
/// Same contract as [`super::decompress_fast::decompress_fast`]: the 64 KiB
/// of memory immediately preceding `output[0]` must be valid to read, and
/// `input` must decode to exactly `output.len()` bytes.
pub unsafe fn decompress_fast_raw(input: &[u8], output: &mut [u8]) -> isize {
    encode(decompress_fast_inner(input, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_returns_non_negative_byte_count() {
        let input = [0x50, b'h', b'e', b'l', b'l', b'o'];
        let mut out = [0u8; 5];
        assert_eq!(decompress_safe_raw(&input, &mut out), 5);
    }

    #[test]
    fn failure_returns_negative_sentinel() {
        // token claims 5 literals but only 2 bytes follow: fails while
        // reading the literal, having consumed the 1-byte token.
        let input = [0x50, b'h', b'e'];
        let mut out = [0u8; 5];
        let r = decompress_safe_raw(&input, &mut out);
        assert!(r < 0);
        assert_eq!(r, -(1 + 1));
    }

    #[test]
    fn fast_raw_reports_input_consumed() {
        let input = [0x50u8, b'h', b'e', b'l', b'l', b'o'];
        let mut out = [0u8; 5];
        let r = unsafe { decompress_fast_raw(&input, &mut out) };
        assert_eq!(r, input.len() as isize);
    }
}
