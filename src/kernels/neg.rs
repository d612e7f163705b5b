//! `neg`: element-wise negation.
//!
//! The checked kernel compares each register against `MIN`, the one signed
//! integer whose negation does not fit. Float negation cannot fail.

use crate::element::SignedElement;
use crate::error::{KernelError, Result};
use crate::kernels::{apply_unary, UnaryArgs, UnaryOp};
use crate::simd::traits::{SimdMask, SimdVec};

/// Negation that fails on the one value without a representable negation.
struct CheckedNeg<T: SignedElement> {
    hazard: Option<(T, T::Vector)>,
}

impl<T: SignedElement> UnaryOp<T> for CheckedNeg<T> {
    const NAME: &'static str = "neg";

    #[inline(always)]
    unsafe fn vector(&mut self, v: T::Vector) -> Result<T::Vector> {
        match self.hazard {
            Some((_, min)) if v.eq_elements(min).any() => Err(KernelError::Overflow),
            _ => Ok(v.neg_elements()),
        }
    }

    #[inline(always)]
    fn scalar(&mut self, v: T) -> Result<T> {
        match self.hazard {
            Some((min, _)) if v == min => Err(KernelError::Overflow),
            _ => Ok(v.neg_lane()),
        }
    }
}

struct WrappingNeg;

impl<T: SignedElement> UnaryOp<T> for WrappingNeg {
    const NAME: &'static str = "neg_unchecked";

    #[inline(always)]
    unsafe fn vector(&mut self, v: T::Vector) -> Result<T::Vector> {
        Ok(v.neg_elements())
    }

    #[inline(always)]
    fn scalar(&mut self, v: T) -> Result<T> {
        Ok(v.neg_lane())
    }
}

/// Element-wise negation, `Overflow` when an integer element is `MIN`.
///
/// ```
/// use numkern::{neg, KernelError, UnaryArgs};
///
/// let mut data = [1i8, -5, 127];
/// neg(UnaryArgs::InPlace(&mut data)).unwrap();
/// assert_eq!(data, [-1, 5, -127]);
///
/// let mut data = [1i8, i8::MIN];
/// assert_eq!(neg(UnaryArgs::InPlace(&mut data)), Err(KernelError::Overflow));
/// ```
pub fn neg<T: SignedElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    // SAFETY: the build script only enables a backend the target supports.
    let hazard = T::NEG_OVERFLOW.map(|min| (min, unsafe { T::Vector::splat(min) }));
    apply_unary(args, CheckedNeg { hazard })
}

/// Element-wise negation; `MIN` wraps to itself.
pub fn neg_unchecked<T: SignedElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    apply_unary(args, WrappingNeg)
}
