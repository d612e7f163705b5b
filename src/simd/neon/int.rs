#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::simd::neon::NeonMask;
use crate::simd::traits::{SimdBits, SimdVec, SimdWidenSum};

// Byte-lane compares already produce a `uint8x16_t` mask.
macro_rules! neon_mask {
    ($cmp:expr) => {
        NeonMask($cmp)
    };
    ($cmp:expr, $cast:ident) => {
        NeonMask($cast($cmp))
    };
}

// VSHL shifts right for negative per-lane counts: arithmetic on signed
// registers, logical on unsigned ones.
macro_rules! neon_shift {
    ($shl:ident, $shr:ident, $reg:ty, $vshl:ident, $dup:ident, $ct:ty) => {
        #[inline(always)]
        unsafe fn $shl(a: $reg, count: u32) -> $reg {
            $vshl(a, $dup(count as $ct))
        }

        #[inline(always)]
        unsafe fn $shr(a: $reg, count: u32) -> $reg {
            $vshl(a, $dup(-(count as $ct)))
        }
    };
}

neon_shift!(shl_s8, shr_s8, int8x16_t, vshlq_s8, vdupq_n_s8, i8);
neon_shift!(shl_u8, shr_u8, uint8x16_t, vshlq_u8, vdupq_n_s8, i8);
neon_shift!(shl_s16, shr_s16, int16x8_t, vshlq_s16, vdupq_n_s16, i16);
neon_shift!(shl_u16, shr_u16, uint16x8_t, vshlq_u16, vdupq_n_s16, i16);
neon_shift!(shl_s32, shr_s32, int32x4_t, vshlq_s32, vdupq_n_s32, i32);
neon_shift!(shl_u32, shr_u32, uint32x4_t, vshlq_u32, vdupq_n_s32, i32);
neon_shift!(shl_s64, shr_s64, int64x2_t, vshlq_s64, vdupq_n_s64, i64);
neon_shift!(shl_u64, shr_u64, uint64x2_t, vshlq_u64, vdupq_n_s64, i64);

// No 64-bit VMIN/VMAX/VMUL: select on the compare, multiply lane by lane.
macro_rules! neon_wide_lanes {
    ($min:ident, $max:ident, $mul:ident, $reg:ty, $t:ty, $bsl:ident, $clt:ident, $cgt:ident, $get:ident, $ld:ident) => {
        #[inline(always)]
        unsafe fn $min(a: $reg, b: $reg) -> $reg {
            $bsl($clt(a, b), a, b)
        }

        #[inline(always)]
        unsafe fn $max(a: $reg, b: $reg) -> $reg {
            $bsl($cgt(a, b), a, b)
        }

        #[inline(always)]
        unsafe fn $mul(a: $reg, b: $reg) -> $reg {
            let lanes: [$t; 2] = [
                $get(a, 0).wrapping_mul($get(b, 0)),
                $get(a, 1).wrapping_mul($get(b, 1)),
            ];
            $ld(lanes.as_ptr())
        }
    };
}

neon_wide_lanes!(min_s64, max_s64, mul_s64, int64x2_t, i64, vbslq_s64, vcltq_s64, vcgtq_s64, vgetq_lane_s64, vld1q_s64);
neon_wide_lanes!(min_u64, max_u64, mul_u64, uint64x2_t, u64, vbslq_u64, vcltq_u64, vcgtq_u64, vgetq_lane_u64, vld1q_u64);

macro_rules! neon_unsigned_neg {
    ($name:ident, $reg:ty, $sub:ident, $dup:ident) => {
        #[inline(always)]
        unsafe fn $name(a: $reg) -> $reg {
            $sub($dup(0), a)
        }
    };
}

neon_unsigned_neg!(neg_u8, uint8x16_t, vsubq_u8, vdupq_n_u8);
neon_unsigned_neg!(neg_u16, uint16x8_t, vsubq_u16, vdupq_n_u16);
neon_unsigned_neg!(neg_u32, uint32x4_t, vsubq_u32, vdupq_n_u32);
neon_unsigned_neg!(neg_u64, uint64x2_t, vsubq_u64, vdupq_n_u64);

macro_rules! neon_int {
    (
        $(#[$doc:meta])*
        $name:ident, $t:ty, $reg:ty, $lanes:expr,
        dup: $dup:ident, ld: $ld:ident, st: $st:ident,
        cmp: [$ceq:ident, $clt:ident, $cle:ident, $cgt:ident, $cge:ident],
        $(mask: $mask:ident,)?
        min: $min:ident, max: $max:ident,
        add: $add:ident, mul: $mul:ident, neg: $neg:ident, orr: $orr:ident,
        shl: $shl:ident, shr: $shr:ident $(,)?
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
                let mut out = [0 as $t; $lanes];
                $st(out.as_mut_ptr(), self.0);
                out
            }

            #[inline(always)]
            unsafe fn eq_elements(self, rhs: Self) -> NeonMask {
                neon_mask!($ceq(self.0, rhs.0) $(, $mask)?)
            }

            #[inline(always)]
            unsafe fn ne_elements(self, rhs: Self) -> NeonMask {
                NeonMask(vmvnq_u8(neon_mask!($ceq(self.0, rhs.0) $(, $mask)?).0))
            }

            #[inline(always)]
            unsafe fn lt_elements(self, rhs: Self) -> NeonMask {
                neon_mask!($clt(self.0, rhs.0) $(, $mask)?)
            }

            #[inline(always)]
            unsafe fn le_elements(self, rhs: Self) -> NeonMask {
                neon_mask!($cle(self.0, rhs.0) $(, $mask)?)
            }

            #[inline(always)]
            unsafe fn gt_elements(self, rhs: Self) -> NeonMask {
                neon_mask!($cgt(self.0, rhs.0) $(, $mask)?)
            }

            #[inline(always)]
            unsafe fn ge_elements(self, rhs: Self) -> NeonMask {
                neon_mask!($cge(self.0, rhs.0) $(, $mask)?)
            }

            #[inline(always)]
            unsafe fn min_elements(self, rhs: Self) -> Self {
                Self($min(self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn max_elements(self, rhs: Self) -> Self {
                Self($max(self.0, rhs.0))
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

        impl SimdBits<$t> for $name {
            #[inline(always)]
            unsafe fn or_elements(self, rhs: Self) -> Self {
                Self($orr(self.0, rhs.0))
            }

            #[inline(always)]
            unsafe fn shl_elements(self, count: u32) -> Self {
                Self($shl(self.0, count))
            }

            #[inline(always)]
            unsafe fn shr_elements(self, count: u32) -> Self {
                Self($shr(self.0, count))
            }
        }
    };
}

neon_int!(
    /// 16 × i8
    I8x16, i8, int8x16_t, 16,
    dup: vdupq_n_s8, ld: vld1q_s8, st: vst1q_s8,
    cmp: [vceqq_s8, vcltq_s8, vcleq_s8, vcgtq_s8, vcgeq_s8],
    min: vminq_s8, max: vmaxq_s8,
    add: vaddq_s8, mul: vmulq_s8, neg: vnegq_s8, orr: vorrq_s8,
    shl: shl_s8, shr: shr_s8,
);

neon_int!(
    /// 16 × u8
    U8x16, u8, uint8x16_t, 16,
    dup: vdupq_n_u8, ld: vld1q_u8, st: vst1q_u8,
    cmp: [vceqq_u8, vcltq_u8, vcleq_u8, vcgtq_u8, vcgeq_u8],
    min: vminq_u8, max: vmaxq_u8,
    add: vaddq_u8, mul: vmulq_u8, neg: neg_u8, orr: vorrq_u8,
    shl: shl_u8, shr: shr_u8,
);

neon_int!(
    /// 8 × i16
    I16x8, i16, int16x8_t, 8,
    dup: vdupq_n_s16, ld: vld1q_s16, st: vst1q_s16,
    cmp: [vceqq_s16, vcltq_s16, vcleq_s16, vcgtq_s16, vcgeq_s16],
    mask: vreinterpretq_u8_u16,
    min: vminq_s16, max: vmaxq_s16,
    add: vaddq_s16, mul: vmulq_s16, neg: vnegq_s16, orr: vorrq_s16,
    shl: shl_s16, shr: shr_s16,
);

neon_int!(
    /// 8 × u16
    U16x8, u16, uint16x8_t, 8,
    dup: vdupq_n_u16, ld: vld1q_u16, st: vst1q_u16,
    cmp: [vceqq_u16, vcltq_u16, vcleq_u16, vcgtq_u16, vcgeq_u16],
    mask: vreinterpretq_u8_u16,
    min: vminq_u16, max: vmaxq_u16,
    add: vaddq_u16, mul: vmulq_u16, neg: neg_u16, orr: vorrq_u16,
    shl: shl_u16, shr: shr_u16,
);

neon_int!(
    /// 4 × i32
    I32x4, i32, int32x4_t, 4,
    dup: vdupq_n_s32, ld: vld1q_s32, st: vst1q_s32,
    cmp: [vceqq_s32, vcltq_s32, vcleq_s32, vcgtq_s32, vcgeq_s32],
    mask: vreinterpretq_u8_u32,
    min: vminq_s32, max: vmaxq_s32,
    add: vaddq_s32, mul: vmulq_s32, neg: vnegq_s32, orr: vorrq_s32,
    shl: shl_s32, shr: shr_s32,
);

neon_int!(
    /// 4 × u32
    U32x4, u32, uint32x4_t, 4,
    dup: vdupq_n_u32, ld: vld1q_u32, st: vst1q_u32,
    cmp: [vceqq_u32, vcltq_u32, vcleq_u32, vcgtq_u32, vcgeq_u32],
    mask: vreinterpretq_u8_u32,
    min: vminq_u32, max: vmaxq_u32,
    add: vaddq_u32, mul: vmulq_u32, neg: neg_u32, orr: vorrq_u32,
    shl: shl_u32, shr: shr_u32,
);

neon_int!(
    /// 2 × i64
    I64x2, i64, int64x2_t, 2,
    dup: vdupq_n_s64, ld: vld1q_s64, st: vst1q_s64,
    cmp: [vceqq_s64, vcltq_s64, vcleq_s64, vcgtq_s64, vcgeq_s64],
    mask: vreinterpretq_u8_u64,
    min: min_s64, max: max_s64,
    add: vaddq_s64, mul: mul_s64, neg: vnegq_s64, orr: vorrq_s64,
    shl: shl_s64, shr: shr_s64,
);

neon_int!(
    /// 2 × u64
    U64x2, u64, uint64x2_t, 2,
    dup: vdupq_n_u64, ld: vld1q_u64, st: vst1q_u64,
    cmp: [vceqq_u64, vcltq_u64, vcleq_u64, vcgtq_u64, vcgeq_u64],
    mask: vreinterpretq_u8_u64,
    min: min_u64, max: max_u64,
    add: vaddq_u64, mul: mul_u64, neg: neg_u64, orr: vorrq_u64,
    shl: shl_u64, shr: shr_u64,
);

// VPADAL adds adjacent lane pairs into the double-width accumulator.
macro_rules! neon_widen {
    ($name:ident, $t:ty => $partial:ident, $wide:ty, $dup:ident, $padal:ident) => {
        impl SimdWidenSum<$t> for $name {
            type Wide = $wide;

            type Partial = $partial;

            #[inline(always)]
            unsafe fn zero_partial() -> $partial {
                $partial($dup(0))
            }

            #[inline(always)]
            unsafe fn widen_add(self, acc: $partial) -> $partial {
                $partial($padal(acc.0, self.0))
            }
        }
    };
}

neon_widen!(I8x16, i8 => I16x8, i16, vdupq_n_s16, vpadalq_s8);
neon_widen!(U8x16, u8 => U16x8, u16, vdupq_n_u16, vpadalq_u8);
neon_widen!(I16x8, i16 => I32x4, i32, vdupq_n_s32, vpadalq_s16);
neon_widen!(U16x8, u16 => U32x4, u32, vdupq_n_u32, vpadalq_u16);
neon_widen!(I32x4, i32 => I64x2, i64, vdupq_n_s64, vpadalq_s32);
neon_widen!(U32x4, u32 => U64x2, u64, vdupq_n_u64, vpadalq_u32);
