//! `shl` and `shr`: element-wise shifts by a count operand.
//!
//! The left operand is shifted by the right one. Counts must lie in
//! `0..BITS`, otherwise the kernel fails with `InvalidShift`. A scalar count
//! is validated once and shifts whole registers; array counts are validated
//! and applied lane by lane. Right shifts are arithmetic for signed elements
//! and logical for unsigned ones.

use std::marker::PhantomData;

use crate::element::IntElement;
use crate::error::Result;
use crate::kernels::{execute_binary, plan_binary, BinaryArgs, BinaryOp};
use crate::simd::traits::SimdBits;
use crate::simd::utils::try_lanewise;

trait Direction {
    const NAME: &'static str;

    unsafe fn vector<T>(v: T::Vector, count: u32) -> T::Vector
    where
        T: IntElement,
        T::Vector: SimdBits<T>;

    fn scalar<T: IntElement>(v: T, count: u32) -> T;
}

struct Left;

impl Direction for Left {
    const NAME: &'static str = "shl";

    #[inline(always)]
    unsafe fn vector<T>(v: T::Vector, count: u32) -> T::Vector
    where
        T: IntElement,
        T::Vector: SimdBits<T>,
    {
        v.shl_elements(count)
    }

    #[inline(always)]
    fn scalar<T: IntElement>(v: T, count: u32) -> T {
        v << count as usize
    }
}

struct Right;

impl Direction for Right {
    const NAME: &'static str = "shr";

    #[inline(always)]
    unsafe fn vector<T>(v: T::Vector, count: u32) -> T::Vector
    where
        T: IntElement,
        T::Vector: SimdBits<T>,
    {
        v.shr_elements(count)
    }

    #[inline(always)]
    fn scalar<T: IntElement>(v: T, count: u32) -> T {
        v >> count as usize
    }
}

/// Every element shifted by one validated count.
struct UniformShift<D> {
    count: u32,
    _direction: PhantomData<D>,
}

impl<T, D> BinaryOp<T> for UniformShift<D>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
    D: Direction,
{
    const NAME: &'static str = D::NAME;

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, _rhs: T::Vector) -> Result<T::Vector> {
        Ok(D::vector::<T>(lhs, self.count))
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, _rhs: T) -> Result<T> {
        Ok(D::scalar(lhs, self.count))
    }
}

/// Per-element counts.
struct VariableShift<D>(PhantomData<D>);

impl<T, D> BinaryOp<T> for VariableShift<D>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
    D: Direction,
{
    const NAME: &'static str = D::NAME;

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        try_lanewise(lhs, rhs, |v: T, count: T| Ok(D::scalar(v, count.shift_count()?)))
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        Ok(D::scalar(lhs, rhs.shift_count()?))
    }
}

fn shift<T, D>(args: BinaryArgs<'_, T>) -> Result<()>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
    D: Direction,
{
    let plan = plan_binary(D::NAME, args)?;

    match plan.rhs.scalar() {
        Some(count) => {
            let count = count.shift_count().inspect_err(|err| {
                tracing::debug!(kernel = D::NAME, len = plan.len(), error = %err, "invalid shift count");
            })?;
            execute_binary(
                &plan,
                UniformShift::<D> {
                    count,
                    _direction: PhantomData,
                },
            )
        }
        None => execute_binary(&plan, VariableShift::<D>(PhantomData)),
    }
}

/// Element-wise left shift of the left operand by the right operand.
///
/// ```
/// use numkern::{shl, BinaryArgs, KernelError};
///
/// let mut data = [1u32, 2, 3];
/// shl(BinaryArgs::ArrayScalarInPlace { data: &mut data, scalar: 4 }).unwrap();
/// assert_eq!(data, [16, 32, 48]);
///
/// let counts = [0u32, 1, 32];
/// let mut out = [0; 3];
/// assert_eq!(
///     shl(BinaryArgs::ScalarArray { scalar: 1, data: &counts, out: &mut out }),
///     Err(KernelError::InvalidShift { count: 32, bits: 32 })
/// );
/// ```
pub fn shl<T>(args: BinaryArgs<'_, T>) -> Result<()>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
{
    shift::<T, Left>(args)
}

/// Element-wise right shift of the left operand by the right operand.
pub fn shr<T>(args: BinaryArgs<'_, T>) -> Result<()>
where
    T: IntElement,
    T::Vector: SimdBits<T>,
{
    shift::<T, Right>(args)
}
