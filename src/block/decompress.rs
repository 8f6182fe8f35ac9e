//! Raw-pointer decoder for LZ4 blocks where the input size is authoritative
//! (`LZ4_decompress_safe` semantics), selected in place of
//! [`super::decompress_safe`] when the `safe-decode` feature is turned off.
//! Implements [`decompress_safe`] and [`decompress_safe_partial`] directly
//! against `*const u8`/`*mut u8` cursors instead of bounds-checked slice
//! indexing, sharing its wildcopy and overlap-pattern primitives with
//! [`super::decompress_fast`] via [`super::rawcopy`]. Other LZ4 decoders
//! split this into separate fast-loop and safe-loop functions; here both
//! collapse into one loop with a one-byte-token shortcut instead.

use crate::block::rawcopy::{
    copy_overlapping_bytewise, copy_using_offset, read_u16_ptr, read_variable_length_ptr,
    wild_copy32, wild_copy8,
};
use crate::block::{
    DecodeFailure, DecompressError, FASTLOOP_SAFE_DISTANCE, MATCH_SAFEGUARD_DISTANCE, MINMATCH,
    RUN_MASK,
};
use crate::fastcpy_unsafe;

#[inline]
fn does_token_fit(token: u8) -> bool {
    (token & RUN_MASK) != RUN_MASK && (token & 0xF0) != 0xF0
}

/// The generic decode routine backing `decompress_safe`/
/// `decompress_safe_partial`, raw-pointer realization. `PARTIAL` selects
/// whether decoding may stop early once the output cap is reached; `output`
/// is already sliced down to the logical write bound, same convention as
/// `decompress_safe::decompress_generic`.
///
/// Exposed `pub(crate)` (rather than re-exported as a public entry point
/// directly) so [`super::raw_abi`] can recover `DecodeFailure::consumed` for
/// the historical negative-sentinel ABI without duplicating decode logic.
#[inline]
pub(crate) fn decompress_generic<const PARTIAL: bool>(
    input: &[u8],
    output: &mut [u8],
) -> Result<usize, DecodeFailure> {
    if output.is_empty() {
        // Same empty-block convention as the safe-decode realization.
        return if input.len() == 1 && input[0] == 0 {
            Ok(0)
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
    if input.is_empty() {
        return Err(DecodeFailure::new(DecompressError::ExpectedAnotherByte, 0));
    }

    unsafe { decompress_generic_ptr::<PARTIAL>(input, output) }
}

/// # Safety
/// None beyond ordinary slice validity: `input`/`output` are valid Rust
/// slices for their full stated lengths, and every pointer this function
/// derives from them stays within (or at most one-past) those bounds.
#[inline]
unsafe fn decompress_generic_ptr<const PARTIAL: bool>(
    input: &[u8],
    output: &mut [u8],
) -> Result<usize, DecodeFailure> {
    let i_start = input.as_ptr();
    let i_end = i_start.add(input.len());
    let mut ip = i_start;

    let o_start = output.as_mut_ptr();
    let o_end = o_start.add(output.len());
    let mut op = o_start;

    // Shortcut eligibility margins, mirroring `decompress_safe`'s
    // `safe_input_pos`/`safe_output_pos`: enough input for a 16-byte
    // literal window plus a 2-byte offset, enough output for an 18-byte
    // window.
    let input_safe = i_end.sub((16 + 2).min(input.len()));
    let output_safe = o_end.sub((16 + 18).min(output.len()));

    loop {
        let consumed = || ip as usize - i_start as usize;

        if ip >= i_end {
            return Err(DecodeFailure::new(
                DecompressError::ExpectedAnotherByte,
                consumed(),
            ));
        }
        let token = ip.read();
        ip = ip.add(1);

        if does_token_fit(token) && (ip as usize) <= input_safe as usize && (op as usize) < output_safe as usize
        {
            let literal_length = (token >> 4) as usize;
            core::ptr::copy_nonoverlapping(ip, op, 16);
            ip = ip.add(literal_length);
            op = op.add(literal_length);

            let offset = read_u16_ptr(&mut ip) as usize;
            if offset == 0 {
                return Err(DecodeFailure::new(
                    DecompressError::OffsetOutOfBounds,
                    consumed(),
                ));
            }
            let match_length = MINMATCH + (token & RUN_MASK) as usize;
            let produced = op as usize - o_start as usize;
            if offset > produced {
                return Err(DecodeFailure::new(
                    DecompressError::OffsetOutOfBounds,
                    consumed(),
                ));
            }
            let match_ptr = op.sub(offset);
            // Shortcut match is at most 18 bytes (14 + MINMATCH); a plain
            // 18-byte `copy` (not `copy_nonoverlapping`, source and
            // destination may overlap when `offset < 18`) is safe for any
            // `offset >= match_length`, and the output headroom proven by
            // `output_safe` covers the 18-byte overshoot regardless.
            if offset >= match_length {
                core::ptr::copy(match_ptr, op, 18);
                op = op.add(match_length);
            } else {
                copy_using_offset_or_fallback(op, match_ptr, op.add(match_length), offset);
                op = op.add(match_length);
            }
            continue;
        }

        let mut literal_length = (token >> 4) as usize;
        if literal_length == RUN_MASK as usize {
            literal_length +=
                read_variable_length_ptr(&mut ip, i_end, true, consumed())?;
        }

        let remaining_out = o_end as usize - op as usize;
        let effective_len = if literal_length > remaining_out {
            if PARTIAL {
                remaining_out
            } else {
                return Err(DecodeFailure::new(
                    DecompressError::OutputTooSmall {
                        expected: (op as usize - o_start as usize) + literal_length,
                        actual: output.len(),
                    },
                    consumed(),
                ));
            }
        } else {
            literal_length
        };

        if effective_len > i_end as usize - ip as usize {
            return Err(DecodeFailure::new(
                DecompressError::LiteralOutOfBounds,
                consumed(),
            ));
        }

        let cpy = op.add(effective_len);
        if o_end as usize - op as usize >= FASTLOOP_SAFE_DISTANCE
            && i_end as usize - ip as usize >= FASTLOOP_SAFE_DISTANCE
        {
            if effective_len > 0 {
                wild_copy32(op, ip, cpy);
            }
        } else {
            fastcpy_unsafe::slice_copy(ip, op, effective_len);
        }
        ip = ip.add(effective_len);
        op = cpy;

        if PARTIAL && effective_len < literal_length {
            // Output cap reached mid-literal; stop here, ignoring any
            // remaining input.
            return Ok(op as usize - o_start as usize);
        }

        if ip >= i_end {
            // Terminal literal-only sequence.
            return Ok(op as usize - o_start as usize);
        }

        if i_end as usize - ip as usize < 2 {
            return Err(DecodeFailure::new(
                DecompressError::ExpectedAnotherByte,
                consumed(),
            ));
        }
        let offset = read_u16_ptr(&mut ip) as usize;
        if offset == 0 {
            return Err(DecodeFailure::new(
                DecompressError::OffsetOutOfBounds,
                consumed(),
            ));
        }

        let mut match_length = MINMATCH + (token & RUN_MASK) as usize;
        if (token & RUN_MASK) == RUN_MASK {
            match_length += read_variable_length_ptr(&mut ip, i_end, true, consumed())?;
        }

        let produced = op as usize - o_start as usize;
        if offset > produced {
            return Err(DecodeFailure::new(
                DecompressError::OffsetOutOfBounds,
                consumed(),
            ));
        }
        let match_ptr = op.sub(offset);

        if match_length > o_end as usize - op as usize {
            if PARTIAL {
                let clamped = o_end as usize - op as usize;
                copy_overlapping_bytewise(op, match_ptr, clamped);
                return Ok(op as usize - o_start as usize + clamped);
            }
            return Err(DecodeFailure::new(
                DecompressError::OutputTooSmall {
                    expected: produced + match_length,
                    actual: output.len(),
                },
                consumed(),
            ));
        }

        let cpy = op.add(match_length);
        if o_end as usize - op as usize >= FASTLOOP_SAFE_DISTANCE.max(MATCH_SAFEGUARD_DISTANCE) {
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
            // Too close to the output end to risk any wildcopy overshoot.
            // A byte-by-byte copy is correct for any offset.
            copy_overlapping_bytewise(op, match_ptr, match_length);
        }
        op = cpy;
    }
}

/// Dispatches the shortcut's optimistic match copy (`match_length <= 18`,
/// `offset < match_length`) to the small-offset pattern builder when
/// possible, falling back to a byte-by-byte copy. Used only on the rare
/// path where the shortcut's match overlaps.
#[inline]
unsafe fn copy_using_offset_or_fallback(dst: *mut u8, src: *const u8, dst_end: *mut u8, offset: usize) {
    if (1..8).contains(&offset) {
        copy_using_offset(dst, src, dst_end, offset);
    } else {
        copy_overlapping_bytewise(dst, src, dst_end as usize - dst as usize);
    }
}

/// Decompresses a full LZ4 block from `input` into `output`, returning the
/// number of bytes written. `output` must be large enough to hold the
/// entire decompressed block, use [`decompress_safe_partial`] if only a
/// prefix is needed.
pub fn decompress_safe(input: &[u8], output: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_generic::<false>(input, output).map_err(Into::into)
}

/// Decompresses at most `target_output_size` bytes of `input` into
/// `output`, stopping as soon as that many bytes have been written even if
/// input remains. `target_output_size` is clamped to `output.len()`.
pub fn decompress_safe_partial(
    input: &[u8],
    output: &mut [u8],
    target_output_size: usize,
) -> Result<usize, DecompressError> {
    let cap = target_output_size.min(output.len());
    decompress_generic::<true>(input, &mut output[..cap]).map_err(Into::into)
}

#[cfg(feature = "std")]
mod std_ext {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Decompresses `input` into a freshly allocated `Vec` of exactly
    /// `uncompressed_size` bytes.
    pub fn decompress_safe_to_vec(
        input: &[u8],
        uncompressed_size: usize,
    ) -> Result<Vec<u8>, DecompressError> {
        let mut out = vec![0u8; uncompressed_size];
        let n = decompress_safe(input, &mut out)?;
        if n != uncompressed_size {
            return Err(DecompressError::UncompressedSizeDiffers {
                expected: uncompressed_size,
                actual: n,
            });
        }
        Ok(out)
    }

    /// Decompresses `input` into a freshly allocated `Vec`, reserving
    /// `capacity_hint` bytes up front and growing if the block turns out
    /// to need more (tracked separately from `uncompressed_size` so a
    /// caller with only an upper bound can still avoid reallocation in the
    /// common case).
    pub fn decompress_safe_to_vec_with_capacity(
        input: &[u8],
        capacity_hint: usize,
    ) -> Result<Vec<u8>, DecompressError> {
        let mut out = vec![0u8; capacity_hint];
        match decompress_safe(input, &mut out) {
            Ok(n) => {
                out.truncate(n);
                Ok(out)
            }
            Err(DecompressError::OutputTooSmall { expected, .. }) => {
                out.resize(expected, 0);
                let n = decompress_safe(input, &mut out)?;
                out.truncate(n);
                Ok(out)
            }
            Err(e) => Err(e),
        }
    }
}
#[cfg(feature = "std")]
pub use std_ext::{decompress_safe_to_vec, decompress_safe_to_vec_with_capacity};
