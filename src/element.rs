//! Element types the kernels are instantiated for.
//!
//! [`Element`] ties each scalar type to the lane type of the compiled backend
//! and defines the scalar semantics every vector path must reproduce.

use std::fmt::Debug;

use num::traits::{WrappingAdd, WrappingMul, WrappingNeg};
use num::{Float, PrimInt};

use crate::error::{KernelError, Result};
use crate::simd::traits::SimdVec;
use crate::simd::{F32x4, F64x2, I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

/// A scalar type with a 128-bit lane group on the active backend.
pub trait Element: Copy + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Lane group used by the vector path.
    type Vector: SimdVec<Self>;

    const ZERO: Self;

    /// Addition, wrapping for integers.
    fn add_lane(self, rhs: Self) -> Self;

    /// Multiplication, wrapping for integers.
    fn mul_lane(self, rhs: Self) -> Self;

    /// Negation, wrapping for integers.
    fn neg_lane(self) -> Self;

    #[inline(always)]
    fn min_lane(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn max_lane(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }
}

/// Fixed-width integer elements.
pub trait IntElement: Element + PrimInt + WrappingAdd + WrappingMul + WrappingNeg {
    const SIGNED: bool;

    /// 64-bit accumulator used by summation.
    type Total: PrimInt + WrappingAdd + Debug + Send + Sync + 'static;

    fn widen(self) -> Self::Total;

    /// Interprets `self` as a shift count for this element width.
    fn shift_count(self) -> Result<u32> {
        let bits = Self::zero().count_zeros();
        let count = self.to_i128().unwrap_or(i128::MAX);

        if (0..i128::from(bits)).contains(&count) {
            Ok(count as u32)
        } else {
            Err(KernelError::InvalidShift { count, bits })
        }
    }
}

/// Elements that support negation.
pub trait SignedElement: Element {
    /// The single value whose negation is not representable, if any.
    const NEG_OVERFLOW: Option<Self>;
}

/// IEEE-754 elements.
pub trait FloatElement: Element + Float {
    const DEGREES_PER_RADIAN: Self;
    const RADIANS_PER_DEGREE: Self;
}

macro_rules! int_element {
    ($t:ty, $vec:ty, $signed:expr, $total:ty) => {
        impl Element for $t {
            type Vector = $vec;

            const ZERO: Self = 0;

            #[inline(always)]
            fn add_lane(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn mul_lane(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn neg_lane(self) -> Self {
                self.wrapping_neg()
            }
        }

        impl IntElement for $t {
            const SIGNED: bool = $signed;

            type Total = $total;

            #[inline(always)]
            fn widen(self) -> $total {
                self as $total
            }
        }
    };
}

int_element!(i8, I8x16, true, i64);
int_element!(u8, U8x16, false, u64);
int_element!(i16, I16x8, true, i64);
int_element!(u16, U16x8, false, u64);
int_element!(i32, I32x4, true, i64);
int_element!(u32, U32x4, false, u64);
int_element!(i64, I64x2, true, i64);
int_element!(u64, U64x2, false, u64);

macro_rules! float_element {
    ($t:ident, $vec:ty) => {
        impl Element for $t {
            type Vector = $vec;

            const ZERO: Self = 0.0;

            #[inline(always)]
            fn add_lane(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn mul_lane(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn neg_lane(self) -> Self {
                -self
            }
        }

        impl FloatElement for $t {
            const DEGREES_PER_RADIAN: Self = 180.0 / std::$t::consts::PI;
            const RADIANS_PER_DEGREE: Self = std::$t::consts::PI / 180.0;
        }

        impl SignedElement for $t {
            const NEG_OVERFLOW: Option<Self> = None;
        }
    };
}

float_element!(f32, F32x4);
float_element!(f64, F64x2);

impl SignedElement for i8 {
    const NEG_OVERFLOW: Option<Self> = Some(i8::MIN);
}

impl SignedElement for i16 {
    const NEG_OVERFLOW: Option<Self> = Some(i16::MIN);
}

impl SignedElement for i32 {
    const NEG_OVERFLOW: Option<Self> = Some(i32::MIN);
}

impl SignedElement for i64 {
    const NEG_OVERFLOW: Option<Self> = Some(i64::MIN);
}
