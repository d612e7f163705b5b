//! `or`: element-wise bitwise OR for integers.

use crate::element::IntElement;
use crate::error::Result;
use crate::kernels::{apply_binary, BinaryArgs, BinaryOp};
use crate::simd::traits::SimdBits;

struct BitOr;

impl<T> BinaryOp<T> for BitOr
where
    T: IntElement,
    T::Vector: SimdBits<T>,
{
    const NAME: &'static str = "or";

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        Ok(lhs.or_elements(rhs))
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        Ok(lhs | rhs)
    }
}

/// Element-wise bitwise OR.
pub fn or<T>(args: BinaryArgs<'_, T>) -> Result<()>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
{
    apply_binary(args, BitOr)
}
