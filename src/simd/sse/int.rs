#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::sse::SseMask;
use crate::simd::traits::{SimdBits, SimdVec, SimdWidenSum};

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn not_si128(a: __m128i) -> __m128i {
    _mm_xor_si128(a, _mm_set1_epi32(-1))
}

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn count_reg(count: u32) -> __m128i {
    _mm_cvtsi32_si128(count as i32)
}

// Unsigned ordering through the signed compare: flip the sign bit of both sides.
macro_rules! unsigned_cmpgt {
    ($name:ident, $cmpgt:ident, $set1:ident, $sign:expr) => {
        #[inline]
        #[target_feature(enable = "sse4.2")]
        unsafe fn $name(a: __m128i, b: __m128i) -> __m128i {
            let sign = $set1($sign);
            $cmpgt(_mm_xor_si128(a, sign), _mm_xor_si128(b, sign))
        }
    };
}

unsigned_cmpgt!(cmpgt_epu8, _mm_cmpgt_epi8, _mm_set1_epi8, i8::MIN);
unsigned_cmpgt!(cmpgt_epu16, _mm_cmpgt_epi16, _mm_set1_epi16, i16::MIN);
unsigned_cmpgt!(cmpgt_epu32, _mm_cmpgt_epi32, _mm_set1_epi32, i32::MIN);
unsigned_cmpgt!(cmpgt_epu64, _mm_cmpgt_epi64, _mm_set1_epi64x, i64::MIN);

// No 64-bit min/max before AVX-512: select on the compare mask.
macro_rules! select_min_max {
    ($min:ident, $max:ident, $cmpgt:ident) => {
        #[inline]
        #[target_feature(enable = "sse4.2")]
        unsafe fn $min(a: __m128i, b: __m128i) -> __m128i {
            _mm_blendv_epi8(a, b, $cmpgt(a, b))
        }

        #[inline]
        #[target_feature(enable = "sse4.2")]
        unsafe fn $max(a: __m128i, b: __m128i) -> __m128i {
            _mm_blendv_epi8(b, a, $cmpgt(a, b))
        }
    };
}

select_min_max!(min_epi64, max_epi64, _mm_cmpgt_epi64);
select_min_max!(min_epu64, max_epu64, cmpgt_epu64);

/// Low byte of each 16-bit product, even and odd bytes multiplied separately.
#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn mullo_epi8(a: __m128i, b: __m128i) -> __m128i {
    let even = _mm_mullo_epi16(a, b);
    let odd = _mm_mullo_epi16(_mm_srli_epi16::<8>(a), _mm_srli_epi16::<8>(b));
    _mm_or_si128(
        _mm_slli_epi16::<8>(odd),
        _mm_and_si128(even, _mm_set1_epi16(0x00FF)),
    )
}

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn mullo_epi64(a: __m128i, b: __m128i) -> __m128i {
    let mut x = [0i64; 2];
    let mut y = [0i64; 2];
    _mm_storeu_si128(x.as_mut_ptr() as *mut __m128i, a);
    _mm_storeu_si128(y.as_mut_ptr() as *mut __m128i, b);
    _mm_set_epi64x(x[1].wrapping_mul(y[1]), x[0].wrapping_mul(y[0]))
}

macro_rules! shift_by {
    ($name:ident, $intrinsic:ident) => {
        #[inline]
        #[target_feature(enable = "sse4.2")]
        unsafe fn $name(a: __m128i, count: u32) -> __m128i {
            $intrinsic(a, count_reg(count))
        }
    };
}

shift_by!(sll_epi16, _mm_sll_epi16);
shift_by!(sll_epi32, _mm_sll_epi32);
shift_by!(sll_epi64, _mm_sll_epi64);
shift_by!(srl_epi16, _mm_srl_epi16);
shift_by!(srl_epi32, _mm_srl_epi32);
shift_by!(srl_epi64, _mm_srl_epi64);
shift_by!(sra_epi16, _mm_sra_epi16);
shift_by!(sra_epi32, _mm_sra_epi32);

// 8-bit shifts run on 16-bit lanes, then clear the bits that crossed a byte.
#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn sll_epi8(a: __m128i, count: u32) -> __m128i {
    let keep = _mm_set1_epi8((0xFFu8 << count) as i8);
    _mm_and_si128(_mm_sll_epi16(a, count_reg(count)), keep)
}

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn srl_epi8(a: __m128i, count: u32) -> __m128i {
    let keep = _mm_set1_epi8((0xFFu8 >> count) as i8);
    _mm_and_si128(_mm_srl_epi16(a, count_reg(count)), keep)
}

// Each byte is duplicated into both halves of a 16-bit lane, so an arithmetic
// shift by count + 8 leaves the sign-extended result in range for the pack.
#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn sra_epi8(a: __m128i, count: u32) -> __m128i {
    let c = count_reg(count + 8);
    let lo = _mm_sra_epi16(_mm_unpacklo_epi8(a, a), c);
    let hi = _mm_sra_epi16(_mm_unpackhi_epi8(a, a), c);
    _mm_packs_epi16(lo, hi)
}

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn sra_epi64(a: __m128i, count: u32) -> __m128i {
    let mut x = [0i64; 2];
    _mm_storeu_si128(x.as_mut_ptr() as *mut __m128i, a);
    _mm_set_epi64x(x[1] >> count, x[0] >> count)
}

macro_rules! sse_int {
    (
        $(#[$doc:meta])*
        $name:ident, $t:ty, $lanes:expr,
        set1: $set1:ident,
        add: $add:ident,
        sub: $sub:ident,
        cmpeq: $cmpeq:ident,
        cmpgt: $cmpgt:ident,
        min: $min:ident,
        max: $max:ident,
        mul: $mul:ident,
        shl: $shl:ident,
        shr: $shr:ident $(,)?
    ) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name(pub(crate) __m128i);

        impl SimdVec<$t> for $name {
            const LANES: usize = $lanes;

            type Mask = SseMask;

            type Array = [$t; $lanes];

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn splat(value: $t) -> Self {
                Self($set1(value as _))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn load(ptr: *const $t) -> Self {
                Self(_mm_loadu_si128(ptr as *const __m128i))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn store_at(self, ptr: *mut $t) {
                _mm_storeu_si128(ptr as *mut __m128i, self.0);
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn to_array(self) -> Self::Array {
                let mut out = [0 as $t; $lanes];
                self.store_at(out.as_mut_ptr());
                out
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn eq_elements(self, rhs: Self) -> SseMask {
                SseMask($cmpeq(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn ne_elements(self, rhs: Self) -> SseMask {
                SseMask(not_si128($cmpeq(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn lt_elements(self, rhs: Self) -> SseMask {
                SseMask($cmpgt(rhs.0, self.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn le_elements(self, rhs: Self) -> SseMask {
                SseMask(not_si128($cmpgt(self.0, rhs.0)))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn gt_elements(self, rhs: Self) -> SseMask {
                SseMask($cmpgt(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn ge_elements(self, rhs: Self) -> SseMask {
                SseMask(not_si128($cmpgt(rhs.0, self.0)))
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
                Self($sub(_mm_setzero_si128(), self.0))
            }
        }

        impl SimdBits<$t> for $name {
            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn or_elements(self, rhs: Self) -> Self {
                Self(_mm_or_si128(self.0, rhs.0))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn shl_elements(self, count: u32) -> Self {
                Self($shl(self.0, count))
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn shr_elements(self, count: u32) -> Self {
                Self($shr(self.0, count))
            }
        }
    };
}

sse_int!(
    /// 16 × i8
    I8x16, i8, 16,
    set1: _mm_set1_epi8, add: _mm_add_epi8, sub: _mm_sub_epi8,
    cmpeq: _mm_cmpeq_epi8, cmpgt: _mm_cmpgt_epi8,
    min: _mm_min_epi8, max: _mm_max_epi8, mul: mullo_epi8,
    shl: sll_epi8, shr: sra_epi8,
);

sse_int!(
    /// 16 × u8
    U8x16, u8, 16,
    set1: _mm_set1_epi8, add: _mm_add_epi8, sub: _mm_sub_epi8,
    cmpeq: _mm_cmpeq_epi8, cmpgt: cmpgt_epu8,
    min: _mm_min_epu8, max: _mm_max_epu8, mul: mullo_epi8,
    shl: sll_epi8, shr: srl_epi8,
);

sse_int!(
    /// 8 × i16
    I16x8, i16, 8,
    set1: _mm_set1_epi16, add: _mm_add_epi16, sub: _mm_sub_epi16,
    cmpeq: _mm_cmpeq_epi16, cmpgt: _mm_cmpgt_epi16,
    min: _mm_min_epi16, max: _mm_max_epi16, mul: _mm_mullo_epi16,
    shl: sll_epi16, shr: sra_epi16,
);

sse_int!(
    /// 8 × u16
    U16x8, u16, 8,
    set1: _mm_set1_epi16, add: _mm_add_epi16, sub: _mm_sub_epi16,
    cmpeq: _mm_cmpeq_epi16, cmpgt: cmpgt_epu16,
    min: _mm_min_epu16, max: _mm_max_epu16, mul: _mm_mullo_epi16,
    shl: sll_epi16, shr: srl_epi16,
);

sse_int!(
    /// 4 × i32
    I32x4, i32, 4,
    set1: _mm_set1_epi32, add: _mm_add_epi32, sub: _mm_sub_epi32,
    cmpeq: _mm_cmpeq_epi32, cmpgt: _mm_cmpgt_epi32,
    min: _mm_min_epi32, max: _mm_max_epi32, mul: _mm_mullo_epi32,
    shl: sll_epi32, shr: sra_epi32,
);

sse_int!(
    /// 4 × u32
    U32x4, u32, 4,
    set1: _mm_set1_epi32, add: _mm_add_epi32, sub: _mm_sub_epi32,
    cmpeq: _mm_cmpeq_epi32, cmpgt: cmpgt_epu32,
    min: _mm_min_epu32, max: _mm_max_epu32, mul: _mm_mullo_epi32,
    shl: sll_epi32, shr: srl_epi32,
);

sse_int!(
    /// 2 × i64
    I64x2, i64, 2,
    set1: _mm_set1_epi64x, add: _mm_add_epi64, sub: _mm_sub_epi64,
    cmpeq: _mm_cmpeq_epi64, cmpgt: _mm_cmpgt_epi64,
    min: min_epi64, max: max_epi64, mul: mullo_epi64,
    shl: sll_epi64, shr: sra_epi64,
);

sse_int!(
    /// 2 × u64
    U64x2, u64, 2,
    set1: _mm_set1_epi64x, add: _mm_add_epi64, sub: _mm_sub_epi64,
    cmpeq: _mm_cmpeq_epi64, cmpgt: cmpgt_epu64,
    min: min_epu64, max: max_epu64, mul: mullo_epi64,
    shl: sll_epi64, shr: srl_epi64,
);

macro_rules! sse_widen {
    ($name:ident, $t:ty => $partial:ident, $wide:ty, $cvt:ident, $add:ident) => {
        impl SimdWidenSum<$t> for $name {
            type Wide = $wide;

            type Partial = $partial;

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn zero_partial() -> $partial {
                $partial(_mm_setzero_si128())
            }

            #[inline]
            #[target_feature(enable = "sse4.2")]
            unsafe fn widen_add(self, acc: $partial) -> $partial {
                let lo = $cvt(self.0);
                let hi = $cvt(_mm_unpackhi_epi64(self.0, self.0));
                $partial($add(acc.0, $add(lo, hi)))
            }
        }
    };
}

sse_widen!(I8x16, i8 => I16x8, i16, _mm_cvtepi8_epi16, _mm_add_epi16);
sse_widen!(U8x16, u8 => U16x8, u16, _mm_cvtepu8_epi16, _mm_add_epi16);
sse_widen!(I16x8, i16 => I32x4, i32, _mm_cvtepi16_epi32, _mm_add_epi32);
sse_widen!(U16x8, u16 => U32x4, u32, _mm_cvtepu16_epi32, _mm_add_epi32);
sse_widen!(I32x4, i32 => I64x2, i64, _mm_cvtepi32_epi64, _mm_add_epi64);
sse_widen!(U32x4, u32 => U64x2, u64, _mm_cvtepu32_epi64, _mm_add_epi64);
