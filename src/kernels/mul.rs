//! `mul`: element-wise product.
//!
//! Checked integer products with a scalar operand are screened against the
//! bounds of [`MulBound`] before each register is multiplied. A zero scalar
//! skips the loop and writes zeros. Array × array products have no fixed
//! operand to bound, so they multiply lane by lane with a checked multiply.
//! Checked float products feed a [`PoisonAccumulator`].

use crate::element::{Element, FloatElement, IntElement};
use crate::error::{KernelError, Result};
use crate::kernels::{apply_binary, execute_binary, plan_binary, BinaryArgs, BinaryOp};
use crate::overflow::{finite, LaneBound, MulBound, PoisonAccumulator};
use crate::simd::traits::SimdVec;
use crate::simd::utils::try_lanewise;

/// Element types `mul` is implemented for.
pub trait Multiply: Element {
    fn mul_checked(args: BinaryArgs<'_, Self>) -> Result<()>;
}

/// Element-wise product, `Overflow` for integers that do not fit and
/// `NonFinite` for NaN or infinite float products.
///
/// On failure the output holds a valid prefix of the products and
/// unspecified values after it.
///
/// ```
/// use numkern::{mul, BinaryArgs, KernelError};
///
/// let lhs = [i16::MAX, 2, -3];
/// let rhs = [1, -2, 3];
/// let mut out = [0; 3];
/// mul(BinaryArgs::ArrayArray { lhs: &lhs, rhs: &rhs, out: &mut out }).unwrap();
/// assert_eq!(out, [i16::MAX, -4, -9]);
///
/// let mut data = [1.0e300f64, 2.0];
/// assert_eq!(
///     mul(BinaryArgs::ScalarArrayInPlace { scalar: 1.0e10, data: &mut data }),
///     Err(KernelError::NonFinite)
/// );
/// ```
pub fn mul<T: Multiply>(args: BinaryArgs<'_, T>) -> Result<()> {
    T::mul_checked(args)
}

/// Element-wise product without detection; integer products wrap.
pub fn mul_unchecked<T: Element>(args: BinaryArgs<'_, T>) -> Result<()> {
    apply_binary(args, WrappingMul)
}

struct WrappingMul;

impl<T: Element> BinaryOp<T> for WrappingMul {
    const NAME: &'static str = "mul_unchecked";

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        Ok(lhs.mul_elements(rhs))
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        Ok(lhs.mul_lane(rhs))
    }
}

/// Array × scalar product behind a precomputed bound.
struct ScreenedMul<T: Element> {
    bound: MulBound<T>,
    lanes: LaneBound<T>,
}

impl<T: IntElement> BinaryOp<T> for ScreenedMul<T> {
    const NAME: &'static str = "mul";

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        if self.lanes.admits(lhs) {
            Ok(lhs.mul_elements(rhs))
        } else {
            Err(KernelError::Overflow)
        }
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        if self.bound.admits(lhs) {
            Ok(lhs.wrapping_mul(&rhs))
        } else {
            Err(KernelError::Overflow)
        }
    }
}

/// Array × array product, each lane checked on its own.
struct PairwiseMul;

impl<T: IntElement> BinaryOp<T> for PairwiseMul {
    const NAME: &'static str = "mul";

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        try_lanewise(lhs, rhs, |a: T, b: T| a.checked_mul(&b).ok_or(KernelError::Overflow))
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        lhs.checked_mul(&rhs).ok_or(KernelError::Overflow)
    }
}

fn mul_checked_int<T: IntElement>(args: BinaryArgs<'_, T>) -> Result<()> {
    let plan = plan_binary("mul", args)?.commuted();

    match plan.rhs.scalar().map(MulBound::for_operand) {
        Some(MulBound::Zero) => {
            plan.fill(T::ZERO);
            Ok(())
        }
        Some(bound) => {
            // SAFETY: the build script only enables a backend the target
            // supports.
            let lanes = unsafe { bound.broadcast() };
            execute_binary(&plan, ScreenedMul { bound, lanes })
        }
        None => execute_binary(&plan, PairwiseMul),
    }
}

/// Float product whose results are checked for finiteness.
struct FiniteMul<T: FloatElement> {
    poison: PoisonAccumulator<T>,
}

impl<T: FloatElement> BinaryOp<T> for FiniteMul<T> {
    const NAME: &'static str = "mul";

    #[inline(always)]
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector> {
        let product = lhs.mul_elements(rhs);
        self.poison.absorb(product);
        Ok(product)
    }

    #[inline(always)]
    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T> {
        finite(lhs * rhs)
    }

    #[inline(always)]
    unsafe fn finish(&mut self) -> Result<()> {
        self.poison.check()
    }
}

fn mul_checked_float<T: FloatElement>(args: BinaryArgs<'_, T>) -> Result<()> {
    // SAFETY: the build script only enables a backend the target supports.
    let poison = unsafe { PoisonAccumulator::new() };
    apply_binary(args, FiniteMul { poison })
}

macro_rules! multiply {
    ($via:ident: $($t:ty),*) => {
        $(
            impl Multiply for $t {
                fn mul_checked(args: BinaryArgs<'_, Self>) -> Result<()> {
                    $via(args)
                }
            }
        )*
    };
}

multiply!(mul_checked_int: i8, u8, i16, u16, i32, u32, i64, u64);
multiply!(mul_checked_float: f32, f64);
