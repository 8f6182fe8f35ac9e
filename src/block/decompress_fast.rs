//! Output-bounded, trusted-input decoder, mirroring `LZ4_decompress_fast`:
//! the original size is authoritative and the decoder trusts its input to
//! be well-formed, with a 64 KiB prefix dictionary preceding the output
//! buffer.
//!
//! Unlike [`super::decompress_safe`]/[`super::decompress`], this entry point
//! does not bound-check the input at all: the caller is trusted to supply a
//! well-formed block whose decompressed size is exactly `output.len()`. It
//! also allows a match offset to reach up to 64 KiB before `output`'s first
//! byte, into memory the caller (not this function) is responsible for
//! having initialized (the implicit "prefix 64k" dictionary). Both of those
//! are why this module is `unsafe fn` unconditionally, rather than behind
//! `safe-decode`.
//!
//! What it does *not* relax is the output bound itself: writing past the end
//! of `output`'s backing allocation is undefined behavior in Rust regardless
//! of how much the caller trusts the input, so every wildcopy here is still
//! gated on the same [`FASTLOOP_SAFE_DISTANCE`] headroom proof the safe loop
//! uses, falling back to an exact, non-overshooting copy for the tail.

use crate::block::rawcopy::{
    copy_overlapping_bytewise, copy_using_offset, read_u16_ptr, read_variable_length_ptr,
    wild_copy32, wild_copy8,
};
use crate::block::{
    DecodeFailure, DecompressError, FASTLOOP_SAFE_DISTANCE, MINMATCH, PREFIX_64K, RUN_MASK,
};

/// Decompresses `input` into `output`, trusting that `input` decodes to
/// exactly `output.len()` bytes and that every match offset is either
/// within the bytes already written to `output` or within 64 KiB before
/// `output`'s first byte.
///
/// Returns the number of input bytes consumed, not the number of output
/// bytes written: the latter is always `output.len()` on success and is
/// already known to the caller.
///
/// # Safety
///
/// - The 64 KiB of memory immediately preceding `output[0]` must be valid
///   to read for the lifetime of this call (or `output` must start at least
///   64 KiB into a larger live allocation, e.g. another block's output
///   immediately followed by this one).
/// - `input` must be a well-formed, complete LZ4 block whose decompressed
///   length is exactly `output.len()`; with the `checked-decode` feature
///   disabled this is not re-validated and violating it is undefined
///   behavior (out-of-bounds reads of `input`, or of the prefix memory
///   above).
pub unsafe fn decompress_fast(input: &[u8], output: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_fast_inner(input, output).map_err(Into::into)
}

/// Same as [`decompress_fast`], but exposes the `DecodeFailure` (error kind
/// plus bytes consumed) needed by [`super::raw_abi`] to reconstruct the
/// historical negative-sentinel ABI.
///
/// # Safety
/// Same contract as [`decompress_fast`].
#[inline]
pub(crate) unsafe fn decompress_fast_inner(
    input: &[u8],
    output: &mut [u8],
) -> Result<usize, DecodeFailure> {
    let i_start = input.as_ptr();
    let i_end = i_start.add(input.len());
    let mut ip = i_start;

    let o_start = output.as_mut_ptr();
    let o_end = o_start.add(output.len());
    let mut op = o_start;

    if output.is_empty() {
        // The only valid encoding of `original_size == 0` is a single zero
        // token, which consumes exactly 1 input byte and produces nothing.
        return if input.len() == 1 && input[0] == 0 {
            Ok(1)
        } else {
            Err(DecodeFailure::new(
                DecompressError::OutputTooSmall {
                    expected: 1,
                    actual: 0,
                },
                0,
            ))
        };
    }

    let checked = cfg!(feature = "checked-decode");

    loop {
        if checked && ip >= i_end {
            return Err(DecodeFailure::new(
                DecompressError::ExpectedAnotherByte,
                ip as usize - i_start as usize,
            ));
        }
        let token = ip.read();
        ip = ip.add(1);

        let mut literal_length = (token >> 4) as usize;
        if literal_length == RUN_MASK as usize {
            literal_length += read_variable_length_ptr(
                &mut ip,
                i_end,
                checked,
                ip as usize - i_start as usize,
            )?;
        }

        if checked && (o_end as usize) - (op as usize) < literal_length {
            return Err(DecodeFailure::new(
                DecompressError::OutputTooSmall {
                    expected: (op as usize - o_start as usize) + literal_length,
                    actual: output.len(),
                },
                ip as usize - i_start as usize,
            ));
        }

        let cpy = op.add(literal_length);
        if (o_end as usize) - (op as usize) >= FASTLOOP_SAFE_DISTANCE {
            // Headroom proven: wildcopy may overshoot `cpy` by up to 31
            // bytes and still land inside `output`.
            if literal_length > 0 {
                wild_copy32(op, ip, cpy);
            }
        } else {
            core::ptr::copy_nonoverlapping(ip, op, literal_length);
        }
        ip = ip.add(literal_length);
        op = cpy;

        if op >= o_end {
            return Ok(ip as usize - i_start as usize);
        }

        if checked && (i_end as usize) - (ip as usize) < 2 {
            return Err(DecodeFailure::new(
                DecompressError::ExpectedAnotherByte,
                ip as usize - i_start as usize,
            ));
        }
        let offset = read_u16_ptr(&mut ip) as usize;
        if offset == 0 {
            return Err(DecodeFailure::new(
                DecompressError::OffsetOutOfBounds,
                ip as usize - i_start as usize,
            ));
        }

        let mut match_length = MINMATCH + (token & RUN_MASK) as usize;
        if (token & RUN_MASK) == RUN_MASK {
            match_length += read_variable_length_ptr(
                &mut ip,
                i_end,
                checked,
                ip as usize - i_start as usize,
            )?;
        }

        if checked {
            let produced = op as usize - o_start as usize;
            if offset > produced + PREFIX_64K {
                return Err(DecodeFailure::new(
                    DecompressError::OffsetOutOfBounds,
                    ip as usize - i_start as usize,
                ));
            }
        }
        let match_ptr = op.sub(offset);

        let cpy = op.add(match_length);
        if checked && cpy as usize > o_end as usize {
            return Err(DecodeFailure::new(
                DecompressError::OutputTooSmall {
                    expected: op as usize - o_start as usize + match_length,
                    actual: output.len(),
                },
                ip as usize - i_start as usize,
            ));
        }

        if (o_end as usize) - (op as usize) >= FASTLOOP_SAFE_DISTANCE {
            if offset < 8 {
                copy_using_offset(op, match_ptr, cpy, offset);
            } else if offset < 16 {
                core::ptr::copy_nonoverlapping(match_ptr, op, 8);
                core::ptr::copy_nonoverlapping(match_ptr.add(8), op.add(8), 8);
                if op.add(16) < cpy {
                    wild_copy8(op.add(16), match_ptr.add(16), cpy);
                }
            } else {
                wild_copy32(op, match_ptr, cpy);
            }
        } else {
            copy_overlapping_bytewise(op, match_ptr, match_length);
        }
        op = cpy;

        if op >= o_end {
            return Ok(ip as usize - i_start as usize);
        }
    }
}
