//! Raw-pointer wildcopy and pattern-copy primitives shared by the
//! non-`safe-decode` realization of the generic decoder ([`super::decompress`])
//! and by [`super::decompress_fast`], which is unsafe unconditionally.
//!
//! These mirror `LZ4_wildCopy8`/`LZ4_wildCopy32`/`LZ4_memcpy_using_offset`
//! from `original_source/lib/lz4/lz4_decompress.c`, translated to raw Rust
//! pointers instead of C pointer arithmetic.

use crate::block::{DecodeFailure, DecompressError, DEC_64_TABLE, INC_32_TABLE};

/// Read a little-endian `u16` from `*ip` and advance `ip` by 2.
///
/// # Safety
/// `*ip .. *ip + 2` must be valid to read.
#[inline]
pub(crate) unsafe fn read_u16_ptr(ip: &mut *const u8) -> u16 {
    let mut buf = [0u8; 2];
    core::ptr::copy_nonoverlapping(*ip, buf.as_mut_ptr(), 2);
    *ip = ip.add(2);
    u16::from_le_bytes(buf)
}

/// Reads an LZ4 variable-length extension: sums `0xFF` bytes until a
/// non-`0xFF` terminator. `ip_limit` bounds the read when `checked` is true;
/// overflow of the `usize` accumulator is reported distinctly from running
/// out of input.
///
/// # Safety
/// When `checked` is false, the caller guarantees the extension terminates
/// within readable memory (used only by `decompress_fast`'s trusted-input
/// contract).
#[inline]
pub(crate) unsafe fn read_variable_length_ptr(
    ip: &mut *const u8,
    ip_limit: *const u8,
    checked: bool,
    consumed_before: usize,
) -> Result<usize, DecodeFailure> {
    let mut sum: usize = 0;
    loop {
        if checked && (*ip as usize) >= (ip_limit as usize) {
            return Err(DecodeFailure::new(
                DecompressError::ExpectedAnotherByte,
                consumed_before,
            ));
        }
        let byte = ip.read();
        *ip = ip.add(1);
        sum = match sum.checked_add(byte as usize) {
            Some(sum) => sum,
            None => {
                return Err(DecodeFailure::new(
                    DecompressError::LengthOverflow,
                    consumed_before,
                ))
            }
        };
        if byte != 0xFF {
            return Ok(sum);
        }
    }
}

/// Copy 8 bytes at a time from `src` to `dst` until `dst` has reached (or
/// passed) `dst_end`. May overwrite up to 7 bytes past `dst_end`; sound only
/// when the caller has proven that headroom exists.
///
/// # Safety
/// `dst_end >= dst`. There must be valid readable memory at `src` and
/// valid writable memory at `dst`, extended up to 8 bytes past `dst_end`.
#[inline]
pub(crate) unsafe fn wild_copy8(mut dst: *mut u8, mut src: *const u8, dst_end: *mut u8) {
    loop {
        core::ptr::copy_nonoverlapping(src, dst, 8);
        dst = dst.add(8);
        src = src.add(8);
        if dst >= dst_end {
            break;
        }
    }
}

/// Copy 16-byte pairs (32 bytes/iteration) from `src` to `dst` until `dst`
/// has reached (or passed) `dst_end`. Two 16-byte copies rather than one
/// 32-byte copy so this stays correct for overlapping matches with
/// `offset >= 16`.
///
/// # Safety
/// Same as [`wild_copy8`], with up to 31 bytes of overwrite past `dst_end`.
#[inline]
pub(crate) unsafe fn wild_copy32(mut dst: *mut u8, mut src: *const u8, dst_end: *mut u8) {
    loop {
        core::ptr::copy_nonoverlapping(src, dst, 16);
        core::ptr::copy_nonoverlapping(src.add(16), dst.add(16), 16);
        dst = dst.add(32);
        src = src.add(32);
        if dst >= dst_end {
            break;
        }
    }
}

/// Small-offset (`offset < 8`) match copy: the match source overlaps the
/// destination, so the bytes being copied repeat with a period equal to
/// `offset`. Builds an 8-byte repeating pattern (or, for periods not
/// dividing 8 evenly, a 4-byte prefix plus a continuation via
/// `INC_32_TABLE`/`DEC_64_TABLE`) and then wildcopies it out to `dst_end`.
///
/// # Safety
/// `offset` must be in `1..8`. `dst_end >= dst`. Valid readable memory at
/// `src` covering the match source, valid writable memory at `dst` with up
/// to 7 bytes of overwrite headroom past `dst_end`.
#[inline]
pub(crate) unsafe fn copy_using_offset(
    dst: *mut u8,
    src: *const u8,
    dst_end: *mut u8,
    offset: usize,
) {
    debug_assert!((1..8).contains(&offset));
    match offset {
        1 => {
            let mut v = [0u8; 8];
            v.fill(src.read());
            write_pattern_loop(dst, &v, dst_end);
        }
        2 => {
            let mut v = [0u8; 8];
            core::ptr::copy_nonoverlapping(src, v.as_mut_ptr(), 2);
            core::ptr::copy_nonoverlapping(src, v.as_mut_ptr().add(2), 2);
            let (lo, hi) = v.split_at_mut(4);
            hi.copy_from_slice(lo);
            write_pattern_loop(dst, &v, dst_end);
        }
        4 => {
            let mut v = [0u8; 8];
            core::ptr::copy_nonoverlapping(src, v.as_mut_ptr(), 4);
            core::ptr::copy_nonoverlapping(src, v.as_mut_ptr().add(4), 4);
            write_pattern_loop(dst, &v, dst_end);
        }
        _ => {
            // offset in {3, 5, 6, 7}: copy a 4-byte prefix, slide the
            // source by inc32[offset], copy 4 more, slide back by
            // dec64[offset]. Leaves `src` positioned so an ordinary
            // 8-byte wildcopy continues the periodic pattern.
            let mut cur_dst = dst;
            let mut cur_src = src;
            core::ptr::copy_nonoverlapping(cur_src, cur_dst, 4);
            cur_src = cur_src.offset(INC_32_TABLE[offset] as isize);
            core::ptr::copy_nonoverlapping(cur_src, cur_dst.add(4), 4);
            cur_src = cur_src.offset(-DEC_64_TABLE[offset] as isize);
            cur_dst = cur_dst.add(8);
            if cur_dst < dst_end {
                wild_copy8(cur_dst, cur_src, dst_end);
            }
        }
    }
}

#[inline]
unsafe fn write_pattern_loop(mut dst: *mut u8, pattern: &[u8; 8], dst_end: *mut u8) {
    loop {
        core::ptr::copy_nonoverlapping(pattern.as_ptr(), dst, 8);
        dst = dst.add(8);
        if dst >= dst_end {
            break;
        }
    }
}

/// Byte-by-byte copy used for overlapping tails that are too close to the
/// output end to widecopy, and for partial-mode copies clamped to an exact
/// length. Correct regardless of whether `src`/`dst` overlap.
///
/// # Safety
/// `dst .. dst + len` must be valid to write, `src .. src + len` valid to
/// read (the ranges are permitted to overlap).
#[inline]
#[cfg_attr(nightly, optimize(size))] // to avoid loop unrolling
pub(crate) unsafe fn copy_overlapping_bytewise(mut dst: *mut u8, mut src: *const u8, len: usize) {
    for _ in 0..len {
        *dst = *src;
        dst = dst.add(1);
        src = src.add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wild_copy8_covers_exact_length() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut dst = [0u8; 16];
        unsafe {
            let dst_end = dst.as_mut_ptr().add(9);
            wild_copy8(dst.as_mut_ptr(), src.as_ptr(), dst_end);
        }
        assert_eq!(&dst[..9], &src[..9]);
    }

    #[test]
    fn copy_using_offset_1_broadcasts() {
        let src = [0xABu8];
        let mut dst = [0u8; 16];
        unsafe {
            let dst_end = dst.as_mut_ptr().add(10);
            copy_using_offset(dst.as_mut_ptr(), src.as_ptr(), dst_end, 1);
        }
        assert!(dst[..10].iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn copy_using_offset_3_continues_period() {
        // offset 3: the 3 bytes immediately before `dst` repeat periodically.
        // Source and destination alias the same buffer, as they do in real
        // match copies (src == dst - offset). The buffer is generously
        // oversized so the wildcopy's overwrite headroom stays in bounds.
        let mut buf = [0u8; 32];
        buf[0] = b'a';
        buf[1] = b'b';
        buf[2] = b'c';
        unsafe {
            let dst = buf.as_mut_ptr().add(3);
            let src = buf.as_ptr();
            let dst_end = buf.as_mut_ptr().add(15);
            copy_using_offset(dst, src, dst_end, 3);
        }
        for i in 3..15 {
            assert_eq!(buf[i], buf[i - 3], "period-3 repetition broken at {i}");
        }
    }
}
