//! Bounds-checked, `forbid(unsafe_code)` decoder for LZ4 blocks where the
//! input size is authoritative (`LZ4_decompress_safe` semantics). This is
//! the default build of the crate.
//!
//! The fast-path/slow-path split of other LZ4 decoders collapses here into
//! a single loop: a "does this token fit in one byte" shortcut runs inline
//! whenever there's comfortable headroom on both sides, and every copy
//! (literal or match) is either a single checked `copy_within`/
//! `copy_from_slice` call or a short forward byte loop. Slice bounds
//! checks already give the safety an unchecked wildcopy buys elsewhere, so
//! there's no separate "prove 32 bytes of headroom, then overshoot" step.

use crate::block::{DecodeFailure, DecompressError, MATCH_SAFEGUARD_DISTANCE, MINMATCH, RUN_MASK};

#[inline]
fn does_token_fit(token: u8) -> bool {
    (token & RUN_MASK) != RUN_MASK && (token & 0xF0) != 0xF0
}

#[inline]
fn read_variable_length(input: &[u8], ip: &mut usize) -> Result<usize, DecodeFailure> {
    let mut sum: usize = 0;
    loop {
        let byte = *input
            .get(*ip)
            .ok_or_else(|| DecodeFailure::new(DecompressError::ExpectedAnotherByte, *ip))?;
        *ip += 1;
        sum = sum
            .checked_add(byte as usize)
            .ok_or_else(|| DecodeFailure::new(DecompressError::LengthOverflow, *ip))?;
        if byte != 0xFF {
            return Ok(sum);
        }
    }
}

/// Copies `match_length` bytes from `output[start..]` to `output[op..]`.
/// `start < op` always holds (checked by the caller via `op.checked_sub`).
///
/// A non-overlapping match (`offset >= match_length`) is a plain copy,
/// widened to a fixed window when there's capacity to spare so the copy
/// isn't re-sized per call. An overlapping match is built byte by byte (or
/// by a single fill, for the run-length case `offset == 1`), which is
/// correct for any offset because each destination byte is only ever read
/// after it has already been written.
#[inline]
fn copy_match(output: &mut [u8], start: usize, op: usize, offset: usize, match_length: usize) {
    if offset >= match_length {
        let cap = output.len();
        match match_length {
            0..=32 if op + 32 <= cap => output.copy_within(start..start + 32, op),
            33..=64 if op + 64 <= cap => output.copy_within(start..start + 64, op),
            _ => output.copy_within(start..start + match_length, op),
        }
    } else if offset == 1 {
        let val = output[start];
        output[op..op + match_length].fill(val);
    } else {
        for i in 0..match_length {
            output[op + i] = output[start + i];
        }
    }
}

/// The generic decode routine, parameterized on `PARTIAL` instead of a
/// runtime flag. `output` is already sliced down to the logical bound the
/// decode must not write past: for [`decompress_safe`] that's the whole
/// buffer, for [`decompress_safe_partial`] it's
/// `output[..target_output_size]`.
pub(crate) fn decompress_generic<const PARTIAL: bool>(
    input: &[u8],
    output: &mut [u8],
) -> Result<usize, DecodeFailure> {
    let in_len = input.len();
    let out_cap = output.len();

    if out_cap == 0 {
        // A single zero token encodes zero literals and no trailing match,
        // the only valid encoding of an empty block.
        return if in_len == 1 && input[0] == 0 {
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

    let mut ip = 0usize;
    let mut op = 0usize;

    // Shortcut eligibility margins: enough input for a 16-byte literal
    // window plus a 2-byte offset, enough output for an 18-byte window.
    let safe_input_pos = in_len.saturating_sub(16 + 2);
    let safe_output_pos = out_cap.saturating_sub(16 + 18);

    loop {
        let token = *input
            .get(ip)
            .ok_or_else(|| DecodeFailure::new(DecompressError::ExpectedAnotherByte, ip))?;
        ip += 1;

        if does_token_fit(token) && ip <= safe_input_pos && op < safe_output_pos {
            let literal_length = (token >> 4) as usize;
            output[op..op + 16].copy_from_slice(&input[ip..ip + 16]);
            ip += literal_length;
            op += literal_length;

            let offset = u16::from_le_bytes([input[ip], input[ip + 1]]) as usize;
            ip += 2;
            if offset == 0 {
                return Err(DecodeFailure::new(DecompressError::OffsetOutOfBounds, ip));
            }
            let match_length = MINMATCH + (token & RUN_MASK) as usize;
            let start = op
                .checked_sub(offset)
                .ok_or_else(|| DecodeFailure::new(DecompressError::OffsetOutOfBounds, ip))?;

            copy_match(output, start, op, offset, match_length);
            op += match_length;
            continue;
        }

        let mut literal_length = (token >> 4) as usize;
        if literal_length == RUN_MASK as usize {
            literal_length += read_variable_length(input, &mut ip)?;
        }

        let effective_len = if op + literal_length > out_cap {
            if PARTIAL {
                out_cap - op
            } else {
                return Err(DecodeFailure::new(
                    DecompressError::OutputTooSmall {
                        expected: op + literal_length,
                        actual: out_cap,
                    },
                    ip,
                ));
            }
        } else {
            literal_length
        };

        if effective_len > in_len - ip {
            return Err(DecodeFailure::new(DecompressError::LiteralOutOfBounds, ip));
        }
        output[op..op + effective_len].copy_from_slice(&input[ip..ip + effective_len]);
        op += effective_len;
        ip += effective_len;

        if PARTIAL && effective_len < literal_length {
            // Hit the output cap mid-literal; stop, ignoring any remaining
            // input.
            return Ok(op);
        }

        if ip >= in_len {
            // Terminal literal-only sequence: a block's last LASTLITERALS
            // bytes are always literals.
            return Ok(op);
        }

        let offset = input
            .get(ip)
            .zip(input.get(ip + 1))
            .map(|(&lo, &hi)| u16::from_le_bytes([lo, hi]))
            .ok_or_else(|| DecodeFailure::new(DecompressError::ExpectedAnotherByte, ip))?
            as usize;
        ip += 2;
        if offset == 0 {
            return Err(DecodeFailure::new(DecompressError::OffsetOutOfBounds, ip));
        }

        let mut match_length = MINMATCH + (token & RUN_MASK) as usize;
        if (token & RUN_MASK) == RUN_MASK {
            match_length += read_variable_length(input, &mut ip)?;
        }

        let start = op
            .checked_sub(offset)
            .ok_or_else(|| DecodeFailure::new(DecompressError::OffsetOutOfBounds, ip))?;

        if op + match_length > out_cap {
            if PARTIAL {
                let clamped = out_cap - op;
                // Too close to the bound to risk the windowed copy. A
                // plain forward byte loop respects the bound exactly and
                // is correct for any offset.
                for i in 0..clamped {
                    output[op + i] = output[start + i];
                }
                return Ok(op + clamped);
            }
            return Err(DecodeFailure::new(
                DecompressError::OutputTooSmall {
                    expected: op + match_length,
                    actual: out_cap,
                },
                ip,
            ));
        }
        let _ = MATCH_SAFEGUARD_DISTANCE; // margin is implicit in the exact-bound check above

        copy_match(output, start, op, offset, match_length);
        op += match_length;
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
    /// `uncompressed_size` bytes. Returns
    /// [`DecompressError::UncompressedSizeDiffers`] if the block's actual
    /// decompressed length doesn't match.
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
    /// `capacity_hint` bytes up front and growing once (to the size the
    /// block actually reports needing) if that hint turns out to be too
    /// small.
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

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_block() {
        let mut out = [0u8; 0];
        assert_eq!(decompress_safe(&[0], &mut out), Ok(0));
    }

    #[test]
    fn empty_block_wrong_token_errors() {
        let mut out = [0u8; 0];
        assert!(decompress_safe(&[1], &mut out).is_err());
    }

    #[test]
    fn literal_only_block() {
        // token: LL=5, ML seed irrelevant (no match follows)
        let input = [0x50, b'h', b'e', b'l', b'l', b'o'];
        let mut out = [0u8; 5];
        assert_eq!(decompress_safe(&input, &mut out), Ok(5));
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn literal_then_rle_match() {
        // "aaaaaaaaaaaa" via one literal 'a' + a match of length 11, offset 1.
        // token: LL=1 (upper nibble), ML=11-4=7 (lower nibble)
        let token = (1u8 << 4) | 7u8;
        let input = [token, b'a', 1, 0];
        let mut out = [0u8; 12];
        assert_eq!(decompress_safe(&input, &mut out), Ok(12));
        assert!(out.iter().all(|&b| b == b'a'));
    }

    #[test]
    fn match_offset_zero_errors() {
        let token = (1u8 << 4) | 0u8;
        let input = [token, b'a', 0, 0];
        let mut out = [0u8; 5];
        assert_eq!(
            decompress_safe(&input, &mut out),
            Err(DecompressError::OffsetOutOfBounds)
        );
    }

    #[test]
    fn match_offset_past_window_errors() {
        let token = (1u8 << 4) | 0u8;
        let input = [token, b'a', 99, 0];
        let mut out = [0u8; 5];
        assert_eq!(
            decompress_safe(&input, &mut out),
            Err(DecompressError::OffsetOutOfBounds)
        );
    }

    #[test]
    fn output_too_small_errors() {
        let input = [0x50, b'h', b'e', b'l', b'l', b'o'];
        let mut out = [0u8; 3];
        assert!(matches!(
            decompress_safe(&input, &mut out),
            Err(DecompressError::OutputTooSmall { .. })
        ));
    }

    #[test]
    fn partial_stops_at_target() {
        let token = (1u8 << 4) | 7u8;
        let input = [token, b'a', 1, 0];
        let mut out = [0u8; 12];
        let n = decompress_safe_partial(&input, &mut out, 6).unwrap();
        assert_eq!(n, 6);
        assert!(out[..6].iter().all(|&b| b == b'a'));
    }

    #[test]
    fn variable_length_literal() {
        // LL seed 15 + extension byte 10 -> literal_length = 15 + 10 = 25
        let mut input = vec![0xF0u8, 10];
        input.extend(core::iter::repeat(b'x').take(25));
        let mut out = [0u8; 25];
        assert_eq!(decompress_safe(&input, &mut out), Ok(25));
        assert!(out.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn read_variable_length_does_not_panic_near_overflow() {
        let mut ip = 0usize;
        let input = [0xFFu8; 9];
        let _ = read_variable_length(&input, &mut ip);
    }
}
