//! ARM NEON backend for AArch64, 128-bit registers.
//!
//! NEON is part of the AArch64 base ISA, so the build script selects this
//! backend for every `aarch64` target, native or cross. 32-bit ARMv7 targets
//! use the portable fallback: their NEON intrinsics are not available on
//! stable Rust, and they lack 64-bit float and 64-bit compare lanes anyway.
//!
//! # Lane Types
//!
//! | Type | Register |
//! |------|----------|
//! | `I8x16`, `U8x16` | `int8x16_t`, `uint8x16_t` |
//! | `I16x8`, `U16x8` | `int16x8_t`, `uint16x8_t` |
//! | `I32x4`, `U32x4` | `int32x4_t`, `uint32x4_t` |
//! | `I64x2`, `U64x2` | `int64x2_t`, `uint64x2_t` |
//! | `F32x4`, `F64x2` | `float32x4_t`, `float64x2_t` |
//!
//! Float min/max are built from compare + bit-select instead of
//! `vminq`/`vmaxq`, which propagate NaN and order signed zeros differently
//! from the SSE and scalar paths.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::simd::traits::SimdMask;

mod float;
mod int;

pub use float::{F32x4, F64x2};
pub use int::{I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

/// Comparison result viewed as bytes; a matching lane has all bits set.
#[derive(Copy, Clone, Debug)]
pub struct NeonMask(pub(crate) uint8x16_t);

impl SimdMask for NeonMask {
    #[inline(always)]
    unsafe fn all(self) -> bool {
        let words = vreinterpretq_u64_u8(self.0);
        vgetq_lane_u64(words, 0) == u64::MAX && vgetq_lane_u64(words, 1) == u64::MAX
    }

    #[inline(always)]
    unsafe fn any(self) -> bool {
        let words = vreinterpretq_u64_u8(self.0);
        (vgetq_lane_u64(words, 0) | vgetq_lane_u64(words, 1)) != 0
    }

    #[inline(always)]
    unsafe fn or(self, rhs: Self) -> Self {
        NeonMask(vorrq_u8(self.0, rhs.0))
    }
}
