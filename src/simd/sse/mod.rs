//! x86_64 SSE4.2 backend, 128-bit registers.
//!
//! Compiled when the build script detects `sse4_2` on the build machine (or
//! `NUMKERN_BACKEND=sse` forces it). SSE4.1 supplies the signed/unsigned
//! min/max, 32-bit multiply, widening conversions and rounding used here;
//! SSE4.2 adds the 64-bit signed compare.
//!
//! # Lane Types
//!
//! | Type | Lanes | Register |
//! |------|-------|----------|
//! | `I8x16`, `U8x16` | 16 | `__m128i` |
//! | `I16x8`, `U16x8` | 8 | `__m128i` |
//! | `I32x4`, `U32x4` | 4 | `__m128i` |
//! | `I64x2`, `U64x2` | 2 | `__m128i` |
//! | `F32x4` | 4 | `__m128` |
//! | `F64x2` | 2 | `__m128d` |
//!
//! Operations SSE has no instruction for (8-bit multiply, 8-bit shifts,
//! unsigned compares, 64-bit min/max) are composed from wider or signed
//! instructions. 64-bit multiply and 64-bit arithmetic right shift run lane
//! by lane.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::SimdMask;

mod float;
mod int;

pub use float::{F32x4, F64x2};
pub use int::{I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

/// Comparison result: every bit of a matching lane is set.
#[derive(Copy, Clone, Debug)]
pub struct SseMask(pub(crate) __m128i);

impl SimdMask for SseMask {
    #[inline]
    #[target_feature(enable = "sse4.2")]
    unsafe fn all(self) -> bool {
        _mm_test_all_ones(self.0) != 0
    }

    #[inline]
    #[target_feature(enable = "sse4.2")]
    unsafe fn any(self) -> bool {
        _mm_testz_si128(self.0, self.0) == 0
    }

    #[inline]
    #[target_feature(enable = "sse4.2")]
    unsafe fn or(self, rhs: Self) -> Self {
        SseMask(_mm_or_si128(self.0, rhs.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::Lanes;
    use crate::simd::traits::{SimdBits, SimdFloat, SimdVec, SimdWidenSum};

    // Every SSE lane type must agree with the portable lanes bit for bit.
    fn check_against_portable<V, T, const N: usize>(a: [T; N], b: [T; N])
    where
        T: crate::Element + crate::IntElement,
        V: SimdVec<T, Array = [T; N]> + SimdBits<T>,
    {
        let shift = |c: u32| c % (std::mem::size_of::<T>() as u32 * 8);
        unsafe {
            let (va, vb) = (V::from_array(&a), V::from_array(&b));
            let (pa, pb) = (Lanes(a), Lanes(b));

            assert_eq!(va.add_elements(vb).to_array(), pa.add_elements(pb).0);
            assert_eq!(va.mul_elements(vb).to_array(), pa.mul_elements(pb).0);
            assert_eq!(va.min_elements(vb).to_array(), pa.min_elements(pb).0);
            assert_eq!(va.max_elements(vb).to_array(), pa.max_elements(pb).0);
            assert_eq!(va.neg_elements().to_array(), pa.neg_elements().0);
            assert_eq!(va.or_elements(vb).to_array(), pa.or_elements(pb).0);
            for count in [0, 1, 3, 7] {
                let c = shift(count);
                assert_eq!(va.shl_elements(c).to_array(), pa.shl_elements(c).0);
                assert_eq!(va.shr_elements(c).to_array(), pa.shr_elements(c).0);
            }
            assert_eq!(va.lt_elements(vb).any(), pa.lt_elements(pb).any());
            assert_eq!(va.le_elements(vb).all(), pa.le_elements(pb).all());
            assert_eq!(va.gt_elements(vb).any(), pa.gt_elements(pb).any());
            assert_eq!(va.ge_elements(vb).all(), pa.ge_elements(pb).all());
            assert_eq!(va.ne_elements(vb).any(), pa.ne_elements(pb).any());
            assert_eq!(va.eq_elements(va).all(), pa.eq_elements(pa).all());
        }
    }

    #[test]
    fn test_sse_int_lanes_match_portable() {
        check_against_portable::<I8x16, i8, 16>(
            [-128, -3, -1, 0, 1, 2, 127, 64, -64, 5, 9, -9, 100, -100, 33, 17],
            [1, -128, 127, 0, -1, 2, 127, -2, 3, 5, -9, -9, 2, 2, -33, 17],
        );
        check_against_portable::<U8x16, u8, 16>(
            [0, 1, 128, 255, 200, 3, 4, 5, 6, 7, 8, 9, 10, 250, 129, 127],
            [255, 1, 127, 255, 2, 3, 40, 50, 6, 70, 8, 90, 10, 5, 128, 128],
        );
        check_against_portable::<I16x8, i16, 8>(
            [i16::MIN, -1, 0, 1, i16::MAX, 300, -300, 7],
            [2, i16::MIN, 0, -1, i16::MAX, -300, 301, 7],
        );
        check_against_portable::<U16x8, u16, 8>(
            [0, 1, 0x8000, u16::MAX, 300, 7, 9, 11],
            [u16::MAX, 0x7FFF, 0x8001, 1, 300, 8, 2, 11],
        );
        check_against_portable::<I32x4, i32, 4>([i32::MIN, -7, 7, i32::MAX], [3, -7, i32::MIN, -1]);
        check_against_portable::<U32x4, u32, 4>([0, 0x8000_0000, u32::MAX, 5], [1, 0x7FFF_FFFF, 3, 5]);
        check_against_portable::<I64x2, i64, 2>([i64::MIN, -5], [7, -5]);
        check_against_portable::<U64x2, u64, 2>([u64::MAX, 1 << 63], [(1 << 63) - 1, 2]);
    }

    #[test]
    fn test_sse_float_lanes_match_portable() {
        let a = [-1.5f32, 0.0, 2.25, -0.0];
        let b = [1.5f32, -0.0, 2.25, 3.0];
        unsafe {
            let (va, vb) = (F32x4::from_array(&a), F32x4::from_array(&b));
            let (pa, pb) = (Lanes(a), Lanes(b));
            assert_eq!(va.min_elements(vb).to_array(), pa.min_elements(pb).0);
            assert_eq!(va.max_elements(vb).to_array(), pa.max_elements(pb).0);
            assert_eq!(va.ceil_elements().to_array(), pa.ceil_elements().0);
            assert_eq!(va.neg_elements().to_array(), pa.neg_elements().0);
            assert!(!va.eq_elements(vb).all());
            assert!(va.eq_elements(vb).any());
        }

        unsafe {
            let nan = F64x2::from_array(&[f64::NAN, 1.0]);
            assert!(!nan.eq_elements(nan).all());
            assert!(nan.ne_elements(nan).any());
        }
    }

    #[test]
    fn test_sse_widen_add() {
        let bytes = [u8::MAX; 16];
        unsafe {
            let mut acc = U8x16::zero_partial();
            for _ in 0..16 {
                acc = U8x16::from_array(&bytes).widen_add(acc);
            }
            assert_eq!(acc.to_array(), [255 * 32; 8]);
        }
    }
}
