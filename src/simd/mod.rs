//! Backend selection.
//!
//! Exactly one backend supplies the lane types `I8x16` .. `F64x2`, chosen at
//! build time by `build.rs` through the `sse`, `neon` or `fallback` cfg flag.
//! The portable [`fallback`] module is always compiled; it is the backend of
//! last resort and the reference the SIMD backends are tested against.

#[cfg(sse)]
pub mod sse;

#[cfg(neon)]
pub mod neon;

pub mod fallback;

pub mod traits;

pub mod utils;

#[cfg(sse)]
pub use sse::{F32x4, F64x2, I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

#[cfg(neon)]
pub use neon::{F32x4, F64x2, I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

#[cfg(not(any(sse, neon)))]
pub use fallback::{F32x4, F64x2, I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

pub use traits::{SimdBits, SimdFloat, SimdMask, SimdVec, SimdWidenSum};
