#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::sse::SseMask;
use crate::simd::traits::{SimdFloat, SimdVec};

// MINPS/MAXPS return the second operand on ties and NaN, which is exactly
// `if a < b { a } else { b }` (resp. `>`), the scalar lane semantics.
macro_rules! sse_float {
    (
        $(#[$doc:meta])*
        $name:ident, $t:ty, $reg:ty, $lanes:expr,
        set1: $set1:ident,
        loadu: $loadu:ident,
        storeu: $storeu:ident,
        cast: $cast:ident,
        ops: [$eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident],
        min: $min:ident,
        max: $max:ident,
        add: $add:ident,
        mul: $mul:ident,
        xor: $xor:ident,
        ceil: $ceil:ident $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name(pub(crate) $reg);

        impl SimdVec<$t> for $name {
            const LANES: usize = $lanes;

            type Mask = SseMask;

            type Array = [$t; $lanes];

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn splat(value: $t) -> Self {
                Self($set1(value))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn load(ptr: *const $t) -> Self {
                Self($loadu(ptr))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn store_at(self, ptr: *mut $t) {
                $storeu(ptr, self.0);
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn to_array(self) -> Self::Array {
                let mut out = [0.0; $lanes];
                $storeu(out.as_mut_ptr(), self.0);
                out
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn eq_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($eq(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn ne_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($ne(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn lt_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($lt(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn le_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($le(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn gt_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($gt(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn ge_elements(self, rhs: Self) -> SseMask {
                SseMask($cast($ge(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn min_elements(self, rhs: Self) -> Self {
                Self($min(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn max_elements(self, rhs: Self) -> Self {
                Self($max(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn add_elements(self, rhs: Self) -> Self {
                Self($add(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn mul_elements(self, rhs: Self) -> Self {
                Self($mul(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn neg_elements(self) -> Self {
                Self($xor(self.0, $set1(-0.0)))
            }
        }

        impl SimdFloat<$t> for $name {
            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn ceil_elements(self) -> Self {
                Self($ceil(self.0))
            }
        }
    };
}

sse_float!(
    /// 4 × f32
    F32x4, f32, __m128, 4,
    set1: _mm_set1_ps, loadu: _mm_loadu_ps, storeu: _mm_storeu_ps, cast: _mm_castps_si128,
    ops: [_mm_cmpeq_ps, _mm_cmpneq_ps, _mm_cmplt_ps, _mm_cmple_ps, _mm_cmpgt_ps, _mm_cmpge_ps],
    min: _mm_min_ps, max: _mm_max_ps, add: _mm_add_ps, mul: _mm_mul_ps,
    xor: _mm_xor_ps, ceil: _mm_ceil_ps,
);

sse_float!(
    /// 2 × f64
    F64x2, f64, __m128d, 2,
    set1: _mm_set1_pd, loadu: _mm_loadu_pd, storeu: _mm_storeu_pd, cast: _mm_castpd_si128,
    ops: [_mm_cmpeq_pd, _mm_cmpneq_pd, _mm_cmplt_pd, _mm_cmple_pd, _mm_cmpgt_pd, _mm_cmpge_pd],
    min: _mm_min_pd, max: _mm_max_pd, add: _mm_add_pd, mul: _mm_mul_pd,
    xor: _mm_xor_pd, ceil: _mm_ceil_pd,
);
