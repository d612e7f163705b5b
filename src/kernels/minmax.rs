//! `amax` and `amin`: extremum of a slice.
//!
//! The vector loop keeps a running extremum per lane; the lanes are then
//! folded with the scalar operator, followed by the tail. Max and min are
//! associative, so the result equals a left-to-right scan for every input
//! without NaN. Float inputs containing NaN give a result that does not
//! depend on the backend but may differ from a left-to-right scan.

use crate::element::Element;
use crate::error::{KernelError, Result};
use crate::kernels::vector_prefix;
use crate::lanes;
use crate::simd::traits::SimdVec;

trait Extremum {
    const NAME: &'static str;

    unsafe fn vector<T: Element>(a: T::Vector, b: T::Vector) -> T::Vector;

    fn scalar<T: Element>(a: T, b: T) -> T;
}

struct Max;

impl Extremum for Max {
    const NAME: &'static str = "amax";

    #[inline(always)]
    unsafe fn vector<T: Element>(a: T::Vector, b: T::Vector) -> T::Vector {
        a.max_elements(b)
    }

    #[inline(always)]
    fn scalar<T: Element>(a: T, b: T) -> T {
        a.max_lane(b)
    }
}

struct Min;

impl Extremum for Min {
    const NAME: &'static str = "amin";

    #[inline(always)]
    unsafe fn vector<T: Element>(a: T::Vector, b: T::Vector) -> T::Vector {
        a.min_elements(b)
    }

    #[inline(always)]
    fn scalar<T: Element>(a: T, b: T) -> T {
        a.min_lane(b)
    }
}

/// # Safety
///
/// The backend's instruction set must be available. `data` is not empty.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn reduce<T: Element, E: Extremum>(data: &[T]) -> T {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>(E::NAME, data.len());
    let ptr = data.as_ptr();

    let (mut best, rest) = if span == 0 {
        (data[0], &data[1..])
    } else {
        let mut acc = T::Vector::load(ptr);
        let mut i = lanes;
        while i < span {
            acc = E::vector::<T>(acc, T::Vector::load(ptr.add(i)));
            i += lanes;
        }

        let collapsed = acc.to_array();
        let (first, others) = collapsed.as_ref().split_at(1);
        let best = others.iter().fold(first[0], |best, &lane| E::scalar(best, lane));
        (best, &data[span..])
    };

    for &x in rest {
        best = E::scalar(best, x);
    }
    best
}

fn extremum<T: Element, E: Extremum>(data: &[T]) -> Result<T> {
    if data.is_empty() {
        tracing::debug!(kernel = E::NAME, "empty input");
        return Err(KernelError::EmptyInput);
    }
    // SAFETY: non-empty; the build script only enables a backend the target
    // supports.
    Ok(unsafe { reduce::<T, E>(data) })
}

/// Largest element, `EmptyInput` for `[]`.
///
/// ```
/// use numkern::amax;
///
/// assert_eq!(amax(&[3i16, -7, 12, 0]), Ok(12));
/// ```
pub fn amax<T: Element>(data: &[T]) -> Result<T> {
    extremum::<T, Max>(data)
}

/// Smallest element, `EmptyInput` for `[]`.
pub fn amin<T: Element>(data: &[T]) -> Result<T> {
    extremum::<T, Min>(data)
}
