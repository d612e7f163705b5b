//! `ceil`: rounding toward positive infinity.

use crate::element::FloatElement;
use crate::error::Result;
use crate::kernels::{apply_unary, UnaryArgs, UnaryOp};
use crate::overflow::{finite, PoisonAccumulator};
use crate::simd::traits::SimdFloat;

struct Ceil<T: FloatElement, const CHECKED: bool> {
    poison: PoisonAccumulator<T>,
}

impl<T, const CHECKED: bool> UnaryOp<T> for Ceil<T, CHECKED>
where
    T: FloatElement,
    T::Vector: SimdFloat<T>,
{
    const NAME: &'static str = if CHECKED { "ceil" } else { "ceil_unchecked" };

    #[inline(always)]
    unsafe fn vector(&mut self, v: T::Vector) -> Result<T::Vector> {
        let rounded = v.ceil_elements();
        if CHECKED {
            self.poison.absorb(rounded);
        }
        Ok(rounded)
    }

    #[inline(always)]
    fn scalar(&mut self, v: T) -> Result<T> {
        if CHECKED {
            finite(v.ceil())
        } else {
            Ok(v.ceil())
        }
    }

    #[inline(always)]
    unsafe fn finish(&mut self) -> Result<()> {
        if CHECKED {
            self.poison.check()
        } else {
            Ok(())
        }
    }
}

fn round_up<T, const CHECKED: bool>(args: UnaryArgs<'_, T>) -> Result<()>
where
    T: FloatElement,
    T::Vector: SimdFloat<T>,
{
    // SAFETY: the build script only enables a backend the target supports.
    let poison = unsafe { PoisonAccumulator::new() };
    apply_unary(args, Ceil::<T, CHECKED> { poison })
}

/// Rounds every element toward positive infinity, `NonFinite` for NaN or
/// infinite elements.
///
/// ```
/// use numkern::{ceil, UnaryArgs};
///
/// let data = [-1.5f32, -0.2, 0.0, 0.3, 2.0, 7.9];
/// let mut out = [0.0; 6];
/// ceil(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
/// assert_eq!(out, [-1.0, -0.0, 0.0, 1.0, 2.0, 8.0]);
/// ```
pub fn ceil<T>(args: UnaryArgs<'_, T>) -> Result<()>
where
    T: FloatElement,
    T::Vector: SimdFloat<T>,
{
    round_up::<T, true>(args)
}

/// Rounds every element toward positive infinity, passing NaN and infinity
/// through.
pub fn ceil_unchecked<T>(args: UnaryArgs<'_, T>) -> Result<()>
where
    T: FloatElement,
    T::Vector: SimdFloat<T>,
{
    round_up::<T, false>(args)
}
