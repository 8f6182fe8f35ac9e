/*! Pure Rust implementation of the LZ4 block decoder.

This crate decodes LZ4-compressed blocks. It does not compress, and it does
not speak the LZ4 frame format (magic number, frame descriptor, content
checksums): it decodes raw blocks, the same payload a frame's `FLG`/`BD`
bytes describe a sequence of. A detailed description of the block format can
be found [here](http://ticki.github.io/blog/how-lz4-works/).

# Examples
```
use lz4_flex::block::decompress_safe;
let compressed = [0x50, b'h', b'e', b'l', b'l', b'o'];
let mut out = [0u8; 5];
let n = decompress_safe(&compressed, &mut out).unwrap();
assert_eq!(&out[..n], b"hello");
```

# Feature Flags
- `std` (default): enables `std::error::Error` impls and `Vec`-returning
  convenience wrappers.
- `safe-decode` (default): the decoder is implemented with bounds-checked
  slice indexing and `#![forbid(unsafe_code)]` in that module. Disabling it
  switches to a raw-pointer realization of the same algorithm, which is
  faster but relies on `unsafe`.
- `checked-decode` (default): adds extra validation to the always-`unsafe`
  [`block::decompress_fast`], which otherwise trusts its input to be
  well-formed. Only disable this for input you already trust.
- `nightly`: enables compiler features only available on a nightly
  toolchain.
*/
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod block;

// Only the non-`safe-decode` realization of the generic decoder
// (`block::decompress`) reaches for this; gated the same way to avoid an
// unused-module warning in the default build.
#[cfg(not(feature = "safe-decode"))]
pub(crate) mod fastcpy_unsafe;

pub use block::{
    decompress_fast, decompress_safe, decompress_safe_partial, DecompressError,
};

#[cfg(feature = "std")]
pub use block::decompress_safe_to_vec;
