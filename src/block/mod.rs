/*!

LZ4 block format: <https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md>

A block is a concatenation of sequences. Each sequence is a one-byte token
(upper nibble: literal length seed, lower nibble: match length seed),
optional length-extension bytes, the literal bytes themselves, and
(everywhere but the last sequence) a 2-byte little-endian match offset plus
optional match-length-extension bytes.

This module implements decoding only.

*/

#[cfg_attr(feature = "safe-decode", forbid(unsafe_code))]
pub mod decompress_safe;

#[cfg(not(feature = "safe-decode"))]
pub mod decompress;

// Raw-pointer primitives shared by the non-safe-decode realization and by
// `decompress_fast`, which is unsafe regardless of the `safe-decode` feature
// because its contract requires caller-guaranteed memory outside any slice
// Rust can see.
pub(crate) mod rawcopy;
pub mod decompress_fast;

pub mod raw_abi;

#[cfg(feature = "safe-decode")]
pub use decompress_safe as decompress;

pub use decompress::{decompress_safe, decompress_safe_partial};
#[cfg(feature = "std")]
pub use decompress::{decompress_safe_to_vec, decompress_safe_to_vec_with_capacity};
pub use decompress_fast::decompress_fast;

use core::fmt;

/// The minimum length of a match. A match shorter than this would not
/// improve on encoding the bytes as literals, so the format never emits one.
pub(crate) const MINMATCH: usize = 4;

/// A wildcopy in the safe loop may write up to this many bytes past the
/// logical end of a literal or match run.
pub(crate) const WILDCOPYLENGTH: usize = 8;

/// The last `LASTLITERALS` bytes of a block are always literals: there is
/// nowhere left, past that point, for a 2-byte offset plus the `MINMATCH`
/// bytes a match would need to reference.
pub(crate) const LASTLITERALS: usize = 5;

/// The final match of a block must end at least `MFLIMIT` bytes before the
/// block's end (it is followed by the `LASTLITERALS`-byte terminal literal
/// run). A block shorter than `MFLIMIT + 1` (the token byte) cannot contain
/// any match at all.
pub(crate) const MFLIMIT: usize = 12;

/// Minimum size of a block that is allowed to contain a match.
pub(crate) const LZ4_MIN_LENGTH: usize = MFLIMIT + 1;

/// When a match's destination cursor is within this many bytes of the
/// output end, the match copy must fall back to a finisher that respects
/// the output bound exactly instead of wildcopying.
pub(crate) const MATCH_SAFEGUARD_DISTANCE: usize = 12;

/// The fast loop is only entered (and re-entered) while at least this many
/// bytes of headroom remain before the output end; every wildcopy inside
/// the fast loop is sound because of that headroom.
pub(crate) const FASTLOOP_SAFE_DISTANCE: usize = 64;

/// Literal/match length seeds of `0xF` mean "read more bytes from a
/// variable-length extension"; see [`decompress_safe::read_variable_length`].
pub(crate) const RUN_MASK: u8 = 0x0F;

/// Size of the implicit dictionary formed by the 64 KiB immediately
/// preceding the output buffer in [`decompress_fast`].
pub(crate) const PREFIX_64K: usize = 64 * 1024;

/// `INC_32_TABLE[offset]` / `DEC_64_TABLE[offset]`: used by the match
/// copier's small-offset (`offset < 8`) regime to build an 8-byte pattern
/// that continues a period-3/5/6/7 repetition after an initial 4-byte
/// prefix copy. Offsets 1, 2, and 4 are handled by direct pattern
/// construction instead (broadcast / 2-byte / 4-byte repeat) and never
/// consult these tables; the entries at those indices are unused filler,
/// kept to match the reference implementation's layout.
pub(crate) const INC_32_TABLE: [usize; 8] = [0, 1, 2, 1, 4, 4, 4, 4];
pub(crate) const DEC_64_TABLE: [i64; 8] = [0, 0, 0, -1, 0, 1, 2, 3];

/// An error representing invalid compressed data, or a caller-supplied
/// buffer too small to hold the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecompressError {
    /// The output buffer is too small for the decompressed data.
    OutputTooSmall { expected: usize, actual: usize },
    /// A caller-provided size hint didn't match the actual decompressed
    /// length.
    UncompressedSizeDiffers { expected: usize, actual: usize },
    /// A literal run claims more bytes than remain in the input.
    LiteralOutOfBounds,
    /// A match's offset points before the start of the legal match source
    /// (the output written so far, plus the prefix dictionary if any).
    OffsetOutOfBounds,
    /// The input ended where another byte (a token, a length-extension
    /// byte, or an offset byte) was expected.
    ExpectedAnotherByte,
    /// A variable-length literal or match length overflowed its accumulator.
    LengthOverflow,
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecompressError::OutputTooSmall { expected, actual } => write!(
                f,
                "output buffer ({actual} bytes) is too small for the decompressed data ({expected} bytes needed)"
            ),
            DecompressError::UncompressedSizeDiffers { expected, actual } => write!(
                f,
                "the expected decompressed size is {expected}, actual {actual}"
            ),
            DecompressError::LiteralOutOfBounds => {
                f.write_str("literal run is out of bounds of the input")
            }
            DecompressError::OffsetOutOfBounds => {
                f.write_str("match offset points before the start of the decompressed buffer")
            }
            DecompressError::ExpectedAnotherByte => {
                f.write_str("expected another byte, found none")
            }
            DecompressError::LengthOverflow => {
                f.write_str("variable-length encoding overflowed its accumulator")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecompressError {}

/// An error paired with how many input bytes had been consumed when it was
/// detected. This is never part of the public API directly, it exists so
/// [`raw_abi`] can recover the historical C ABI's negative sentinel
/// (`-(1 + consumed)`) without duplicating decode logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeFailure {
    pub kind: DecompressError,
    pub consumed: usize,
}

impl From<DecodeFailure> for DecompressError {
    fn from(failure: DecodeFailure) -> Self {
        failure.kind
    }
}

impl DecodeFailure {
    #[inline]
    pub(crate) fn new(kind: DecompressError, consumed: usize) -> Self {
        DecodeFailure { kind, consumed }
    }
}
