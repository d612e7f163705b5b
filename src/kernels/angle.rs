//! Degree/radian conversion, a multiply by a constant register.

use std::marker::PhantomData;

use crate::element::FloatElement;
use crate::error::Result;
use crate::kernels::{apply_unary, UnaryArgs, UnaryOp};
use crate::overflow::{finite, PoisonAccumulator};
use crate::simd::traits::SimdVec;

trait Conversion {
    const NAME: &'static str;

    fn factor<T: FloatElement>() -> T;
}

struct ToDegrees;

impl Conversion for ToDegrees {
    const NAME: &'static str = "degrees";

    fn factor<T: FloatElement>() -> T {
        T::DEGREES_PER_RADIAN
    }
}

struct ToRadians;

impl Conversion for ToRadians {
    const NAME: &'static str = "radians";

    fn factor<T: FloatElement>() -> T {
        T::RADIANS_PER_DEGREE
    }
}

struct Scale<T: FloatElement, C, const CHECKED: bool> {
    factor: T,
    lanes: T::Vector,
    poison: PoisonAccumulator<T>,
    _conversion: PhantomData<C>,
}

impl<T: FloatElement, C: Conversion, const CHECKED: bool> Scale<T, C, CHECKED> {
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn new() -> Self {
        let factor = C::factor::<T>();
        Self {
            factor,
            lanes: T::Vector::splat(factor),
            poison: PoisonAccumulator::new(),
            _conversion: PhantomData,
        }
    }
}

impl<T: FloatElement, C: Conversion, const CHECKED: bool> UnaryOp<T> for Scale<T, C, CHECKED> {
    const NAME: &'static str = C::NAME;

    #[inline(always)]
    unsafe fn vector(&mut self, v: T::Vector) -> Result<T::Vector> {
        let scaled = v.mul_elements(self.lanes);
        if CHECKED {
            self.poison.absorb(scaled);
        }
        Ok(scaled)
    }

    #[inline(always)]
    fn scalar(&mut self, v: T) -> Result<T> {
        let scaled = v * self.factor;
        if CHECKED {
            finite(scaled)
        } else {
            Ok(scaled)
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

fn convert<T: FloatElement, C: Conversion, const CHECKED: bool>(args: UnaryArgs<'_, T>) -> Result<()> {
    // SAFETY: the build script only enables a backend the target supports.
    let op = unsafe { Scale::<T, C, CHECKED>::new() };
    apply_unary(args, op)
}

/// Radians to degrees, `NonFinite` if any result is NaN or infinite.
///
/// ```
/// use numkern::{degrees, UnaryArgs};
///
/// let mut data = [std::f64::consts::PI, 0.0];
/// degrees(UnaryArgs::InPlace(&mut data)).unwrap();
/// assert!((data[0] - 180.0).abs() < 1e-12);
/// ```
pub fn degrees<T: FloatElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    convert::<T, ToDegrees, true>(args)
}

/// Radians to degrees without the finiteness check.
pub fn degrees_unchecked<T: FloatElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    convert::<T, ToDegrees, false>(args)
}

/// Degrees to radians, `NonFinite` if any result is NaN or infinite.
pub fn radians<T: FloatElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    convert::<T, ToRadians, true>(args)
}

/// Degrees to radians without the finiteness check.
pub fn radians_unchecked<T: FloatElement>(args: UnaryArgs<'_, T>) -> Result<()> {
    convert::<T, ToRadians, false>(args)
}
