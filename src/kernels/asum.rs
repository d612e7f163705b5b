//! `asum`: sum of a slice into a 64-bit total.
//!
//! Integers up to 32 bits are summed in chunks of [`SUM_CHUNK`] elements.
//! Within a chunk each register is added into lanes of twice its width,
//! which cannot overflow over one chunk, and the lanes are then widened into
//! the 64-bit chunk total. Only adding a chunk total to the running total
//! can overflow, so the checked kernel tests once per chunk instead of once
//! per element.
//!
//! 64-bit integers have no wider lane type: the checked kernel adds with a
//! per-element check and the unchecked kernel uses wrapping vector adds.
//! Floats are summed with vector adds and the total is checked for
//! finiteness; their reduction order differs from a left-to-right scan, so
//! results may differ from one in the last bits.

use std::fmt::Debug;
use std::ops::Add;

use num::traits::{WrappingAdd, Zero};

use crate::element::{Element, IntElement};
use crate::error::{KernelError, Result};
use crate::kernels::vector_prefix;
use crate::lanes;
use crate::overflow::accumulate_chunks;
use crate::simd::traits::{SimdVec, SimdWidenSum};

/// Elements per independently reduced chunk.
pub const SUM_CHUNK: usize = 256;

/// Element types `asum` is implemented for.
pub trait Summable: Element {
    /// `i64` for signed integers, `u64` for unsigned, `Self` for floats.
    type Total: Copy + PartialEq + Debug;

    fn sum_checked(data: &[Self]) -> Result<Self::Total>;

    fn sum_unchecked(data: &[Self]) -> Self::Total;
}

/// Sum of `data`.
///
/// `Overflow` if an integer total leaves the 64-bit accumulator, `NonFinite`
/// if a float total is NaN or infinite. The sum of `[]` is zero.
///
/// ```
/// use numkern::asum;
///
/// let data = vec![i8::MAX; 1000];
/// assert_eq!(asum(&data), Ok(127_000i64));
/// assert!(asum(&[f32::MAX, f32::MAX]).is_err());
/// ```
pub fn asum<T: Summable>(data: &[T]) -> Result<T::Total> {
    T::sum_checked(data)
}

/// Sum of `data` without overflow detection; integer totals wrap.
pub fn asum_unchecked<T: Summable>(data: &[T]) -> T::Total {
    T::sum_unchecked(data)
}

type Wide<T> = <<T as Element>::Vector as SimdWidenSum<T>>::Wide;

/// Total of one chunk of at most [`SUM_CHUNK`] elements.
///
/// # Safety
///
/// The backend's instruction set must be available.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn chunk_total<T>(chunk: &[T]) -> T::Total
where
    T: IntElement,
    T::Vector: SimdWidenSum<T>,
    Wide<T>: Into<T::Total>,
{
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>("asum", chunk.len());
    let ptr = chunk.as_ptr();

    let mut partial = T::Vector::zero_partial();
    let mut i = 0;
    while i < span {
        partial = T::Vector::load(ptr.add(i)).widen_add(partial);
        i += lanes;
    }

    let mut total = T::Total::zero();
    for &lane in partial.to_array().as_ref() {
        let lane: T::Total = lane.into();
        total = Add::add(total, lane);
    }
    for &x in &chunk[span..] {
        total = Add::add(total, x.widen());
    }
    total
}

fn narrow_checked<T>(data: &[T]) -> Result<T::Total>
where
    T: IntElement,
    T::Vector: SimdWidenSum<T>,
    Wide<T>: Into<T::Total>,
{
    // SAFETY: the build script only enables a backend the target supports.
    let chunks = data.chunks(SUM_CHUNK).map(|chunk| unsafe { chunk_total(chunk) });

    accumulate_chunks(chunks).map_err(|overflow| {
        tracing::debug!(
            kernel = "asum",
            len = data.len(),
            chunk = overflow.chunk,
            partial = ?overflow.partial,
            "chunk total overflowed the accumulator"
        );
        KernelError::Overflow
    })
}

fn narrow_unchecked<T>(data: &[T]) -> T::Total
where
    T: IntElement,
    T::Vector: SimdWidenSum<T>,
    Wide<T>: Into<T::Total>,
{
    data.chunks(SUM_CHUNK)
        // SAFETY: the build script only enables a backend the target supports.
        .map(|chunk| unsafe { chunk_total(chunk) })
        .fold(T::Total::zero(), |total, sum| total.wrapping_add(&sum))
}

/// Sum with [`Element::add_lane`], which wraps for integers.
///
/// # Safety
///
/// The backend's instruction set must be available.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn lane_sum<T: Element>(data: &[T]) -> T {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>("asum", data.len());
    let ptr = data.as_ptr();

    let mut acc = T::Vector::splat(T::ZERO);
    let mut i = 0;
    while i < span {
        acc = acc.add_elements(T::Vector::load(ptr.add(i)));
        i += lanes;
    }

    let mut total = acc
        .to_array()
        .as_ref()
        .iter()
        .fold(T::ZERO, |total, &lane| total.add_lane(lane));
    for &x in &data[span..] {
        total = total.add_lane(x);
    }
    total
}

fn wide_checked<T: IntElement<Total = T>>(data: &[T]) -> Result<T> {
    let mut total = T::zero();
    for (i, x) in data.iter().enumerate() {
        total = match total.checked_add(x) {
            Some(total) => total,
            None => {
                tracing::debug!(kernel = "asum", len = data.len(), index = i, partial = ?total, "total overflowed");
                return Err(KernelError::Overflow);
            }
        };
    }
    Ok(total)
}

macro_rules! summable_narrow {
    ($($t:ty),*) => {
        $(
            impl Summable for $t {
                type Total = <$t as IntElement>::Total;

                fn sum_checked(data: &[Self]) -> Result<Self::Total> {
                    narrow_checked(data)
                }

                fn sum_unchecked(data: &[Self]) -> Self::Total {
                    narrow_unchecked(data)
                }
            }
        )*
    };
}

summable_narrow!(i8, u8, i16, u16, i32, u32);

macro_rules! summable_wide {
    ($($t:ty),*) => {
        $(
            impl Summable for $t {
                type Total = $t;

                fn sum_checked(data: &[Self]) -> Result<Self> {
                    wide_checked(data)
                }

                fn sum_unchecked(data: &[Self]) -> Self {
                    // SAFETY: the build script only enables a backend the
                    // target supports.
                    unsafe { lane_sum(data) }
                }
            }
        )*
    };
}

summable_wide!(i64, u64);

macro_rules! summable_float {
    ($($t:ty),*) => {
        $(
            impl Summable for $t {
                type Total = $t;

                fn sum_checked(data: &[Self]) -> Result<Self> {
                    let total = Self::sum_unchecked(data);
                    if total.is_finite() {
                        Ok(total)
                    } else {
                        tracing::debug!(kernel = "asum", len = data.len(), total, "non-finite total");
                        Err(KernelError::NonFinite)
                    }
                }

                fn sum_unchecked(data: &[Self]) -> Self {
                    // SAFETY: the build script only enables a backend the
                    // target supports.
                    unsafe { lane_sum(data) }
                }
            }
        )*
    };
}

summable_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_total_extremes() {
        let data = vec![i8::MIN; SUM_CHUNK];
        assert_eq!(unsafe { chunk_total(&data) }, -128 * SUM_CHUNK as i64);
        let data = vec![u16::MAX; SUM_CHUNK];
        assert_eq!(unsafe { chunk_total(&data) }, u16::MAX as u64 * SUM_CHUNK as u64);
        let data = vec![i32::MIN; SUM_CHUNK - 3];
        assert_eq!(unsafe { chunk_total(&data) }, i32::MIN as i64 * (SUM_CHUNK as i64 - 3));
    }

    #[test]
    fn test_narrow_sums_across_chunks() {
        let data: Vec<i16> = (0..3 * SUM_CHUNK + 17).map(|i| (i as i16 % 97) * -331).collect();
        let expected: i64 = data.iter().map(|&x| x as i64).sum();
        assert_eq!(narrow_checked(&data), Ok(expected));
        assert_eq!(narrow_unchecked(&data), expected);

        let data = vec![u32::MAX; 2 * SUM_CHUNK + 5];
        let expected = u32::MAX as u64 * data.len() as u64;
        assert_eq!(narrow_checked(&data), Ok(expected));
        assert_eq!(narrow_unchecked(&data), expected);
    }

    #[test]
    fn test_wide_checked_boundary() {
        assert_eq!(wide_checked(&[i64::MAX - 1, 1]), Ok(i64::MAX));
        assert_eq!(wide_checked(&[i64::MAX, 1, -5]), Err(KernelError::Overflow));
        assert_eq!(wide_checked(&[i64::MIN, -1]), Err(KernelError::Overflow));
        assert_eq!(wide_checked(&[u64::MAX, 1]), Err(KernelError::Overflow));
    }

    #[test]
    fn test_lane_sum_wraps() {
        let data = vec![u64::MAX; 5];
        assert_eq!(unsafe { lane_sum(&data) }, u64::MAX.wrapping_mul(5));
    }

    #[test]
    fn test_float_total_checked() {
        assert_eq!(asum(&[1.5f64; 10]), Ok(15.0));
        assert_eq!(asum(&[f64::MAX; 10]), Err(KernelError::NonFinite));
        assert!(asum_unchecked(&[f64::MAX; 10]).is_infinite());
        assert_eq!(asum::<f32>(&[]), Ok(0.0));
    }
}
