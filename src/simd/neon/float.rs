#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::simd::neon::NeonMask;
use crate::simd::traits::{SimdFloat, SimdVec};

macro_rules! neon_float {
    (
        $(#[$doc:meta])*
        $name:ident, $t:ty, $reg:ty, $lanes:expr,
        dup: $dup:ident, ld: $ld:ident, st: $st:ident,
        cmp: [$ceq:ident, $clt:ident, $cle:ident, $cgt:ident, $cge:ident],
        mask: $mask:ident, bsl: $bsl:ident,
        add: $add:ident, mul: $mul:ident, neg: $neg:ident, ceil: $ceil:ident $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name(pub(crate) $reg);

        impl SimdVec<$t> for $name {
            const LANES: usize = $lanes;

            type Mask = NeonMask;

            type Array = [$t; $lanes];

            #[inline(always)]
            unsafe fn splat(value: $t) -> Self {
                Self($dup(value))
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self($ld(ptr))
            }

            #[inline(always)]
            unsafe fn store_at(self, ptr: *mut $t) {
                $st(ptr, self.0);
            }

            #[inline(always)]
            unsafe fn to_array(self) -> Self::Array {
                let mut out = [0.0; $lanes];
                $st(out.as_mut_ptr(), self.0);
                out
            }

            #[inline(always)]
            unsafe fn eq_elements(self, rhs: Self) -> NeonMask {
                NeonMask($mask($ceq(self.0, rhs.0)))
            }

            #[inline(always)]
            unsafe fn ne_elements(self, rhs: Self) -> NeonMask {
                NeonMask(vmvnq_u8($mask($ceq(self.0, rhs.0))))
            }

            #[inline(always)]
            unsafe fn lt_elements(self, rhs: Self) -> NeonMask {
                NeonMask($mask($clt(self.0, rhs.0)))
            }

            #[inline(always)]
            unsafe fn le_elements(self, rhs: Self) -> NeonMask {
                NeonMask($mask($cle(self.0, rhs.0)))
            }

            #[inline(always)]
            unsafe fn gt_elements(self, rhs: Self) -> NeonMask {
                NeonMask($mask($cgt(self.0, rhs.0)))
            }

            #[inline(always)]
            unsafe fn ge_elements(self, rhs: Self) -> NeonMask {
                NeonMask($mask($cge(self.0, rhs.0)))
            }

            #[inline(always)]
            unsafe fn min_elements(self, rhs: Self) -> Self {
                Self($bsl($clt(self.0, rhs.0), self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn max_elements(self, rhs: Self) -> Self {
                Self($bsl($cgt(self.0, rhs.0), self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn add_elements(self, rhs: Self) -> Self {
                Self($add(self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn mul_elements(self, rhs: Self) -> Self {
                Self($mul(self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn neg_elements(self) -> Self {
                Self($neg(self.0))
            }
        }

        impl SimdFloat<$t> for $name {
            #[inline(always)]
            unsafe fn ceil_elements(self) -> Self {
                Self($ceil(self.0))
            }
        }
    };
}

neon_float!(
    /// 4 × f32
    F32x4, f32, float32x4_t, 4,
    dup: vdupq_n_f32, ld: vld1q_f32, st: vst1q_f32,
    cmp: [vceqq_f32, vcltq_f32, vcleq_f32, vcgtq_f32, vcgeq_f32],
    mask: vreinterpretq_u8_u32, bsl: vbslq_f32,
    add: vaddq_f32, mul: vmulq_f32, neg: vnegq_f32, ceil: vrndpq_f32,
);

neon_float!(
    /// 2 × f64
    F64x2, f64, float64x2_t, 2,
    dup: vdupq_n_f64, ld: vld1q_f64, st: vst1q_f64,
    cmp: [vceqq_f64, vcltq_f64, vcleq_f64, vcgtq_f64, vcgeq_f64],
    mask: vreinterpretq_u8_u64, bsl: vbslq_f64,
    add: vaddq_f64, mul: vmulq_f64, neg: vnegq_f64, ceil: vrndpq_f64,
);
