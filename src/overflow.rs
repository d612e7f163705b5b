//! Overflow and non-finite detection shared by the checked kernels.
//!
//! Integer kernels screen their inputs against bounds derived once from the
//! scalar operand ([`MulBound`], broadcast to registers as [`LaneBound`]).
//! Float kernels cannot bound their inputs ahead of time, so they feed every
//! result register into a [`PoisonAccumulator`] and test it once at the end.
//! Summation bounds its per-element cost by reducing fixed chunks and
//! checking only the chunk totals ([`accumulate_chunks`]).

use num::traits::{CheckedAdd, Zero};

use crate::element::{Element, FloatElement, IntElement};
use crate::error::{KernelError, Result};
use crate::simd::traits::{SimdMask, SimdVec};

/// Range of values that can be multiplied by a fixed operand `k` without
/// leaving the element type.
///
/// Dividing the type's range by `k` gives the bounds: `MIN/k ..= MAX/k` for
/// `k > 0`, and the swapped pair `MAX/k ..= MIN/k` for `k < 0`, since a
/// negative divisor flips the range. Integer division truncates toward zero,
/// which lands each bound on the innermost admissible value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulBound<T> {
    /// `k == 0`: every product is zero.
    Zero,
    /// The product is representable iff `lo <= v <= hi`.
    Range { lo: T, hi: T },
    /// `k == -1`: only `MIN` overflows. `MIN / -1` itself overflows, so this
    /// case cannot be expressed as a range.
    NegatesMin,
}

impl<T: IntElement> MulBound<T> {
    pub fn for_operand(k: T) -> Self {
        if k.is_zero() {
            return MulBound::Zero;
        }

        if k < T::zero() {
            // k < 0, so k + 1 cannot overflow.
            if (k + T::one()).is_zero() {
                return MulBound::NegatesMin;
            }
            MulBound::Range {
                lo: T::max_value() / k,
                hi: T::min_value() / k,
            }
        } else {
            MulBound::Range {
                lo: T::min_value() / k,
                hi: T::max_value() / k,
            }
        }
    }

    /// True when `v * k` is representable.
    #[inline(always)]
    pub fn admits(&self, v: T) -> bool {
        match *self {
            MulBound::Zero => true,
            MulBound::Range { lo, hi } => lo <= v && v <= hi,
            MulBound::NegatesMin => v != T::min_value(),
        }
    }

    /// Broadcasts the bounds to registers, once per kernel call.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn broadcast(self) -> LaneBound<T> {
        match self {
            MulBound::Zero => LaneBound::Any,
            MulBound::Range { lo, hi } => LaneBound::Range {
                lo: T::Vector::splat(lo),
                hi: T::Vector::splat(hi),
            },
            MulBound::NegatesMin => LaneBound::Excludes(T::Vector::splat(T::min_value())),
        }
    }
}

/// [`MulBound`] held in registers for screening whole lane groups.
#[derive(Clone, Copy)]
pub enum LaneBound<T: Element> {
    Any,
    Range { lo: T::Vector, hi: T::Vector },
    Excludes(T::Vector),
}

impl<T: Element> LaneBound<T> {
    /// True when no lane of `v` violates the bound.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn admits(&self, v: T::Vector) -> bool {
        match *self {
            LaneBound::Any => true,
            LaneBound::Range { lo, hi } => !v.lt_elements(lo).or(v.gt_elements(hi)).any(),
            LaneBound::Excludes(value) => !v.eq_elements(value).any(),
        }
    }
}

/// Running product of result registers, seeded with zero.
///
/// `0 * x` stays zero for every finite `x`, while `0 * inf` and `0 * NaN`
/// are NaN, and NaN absorbs every later product. The accumulator therefore
/// ends non-finite iff some absorbed lane was non-finite.
#[derive(Clone, Copy)]
pub struct PoisonAccumulator<T: FloatElement> {
    acc: T::Vector,
}

impl<T: FloatElement> PoisonAccumulator<T> {
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn new() -> Self {
        Self {
            acc: T::Vector::splat(T::ZERO),
        }
    }

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn absorb(&mut self, result: T::Vector) {
        self.acc = self.acc.mul_elements(result);
    }

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn is_poisoned(&self) -> bool {
        self.acc.to_array().as_ref().iter().any(|lane| !lane.is_finite())
    }

    /// `NonFinite` if any absorbed lane was NaN or infinite.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    pub unsafe fn check(&self) -> Result<()> {
        if self.is_poisoned() {
            Err(KernelError::NonFinite)
        } else {
            Ok(())
        }
    }
}

/// Per-element finiteness check used by the scalar tails.
#[inline(always)]
pub fn finite<T: FloatElement>(value: T) -> Result<T> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KernelError::NonFinite)
    }
}

/// A chunk total that did not fit the running accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOverflow<A> {
    /// Total of the chunks before the offending one.
    pub partial: A,
    /// Index of the offending chunk.
    pub chunk: usize,
}

/// Adds chunk totals with one overflow check per chunk.
///
/// Stops at the first chunk whose total does not fit, reporting the partial
/// sum accumulated before it.
pub fn accumulate_chunks<A, I>(chunks: I) -> std::result::Result<A, ChunkOverflow<A>>
where
    A: CheckedAdd + Zero + Copy,
    I: IntoIterator<Item = A>,
{
    let mut total = A::zero();

    for (chunk, sum) in chunks.into_iter().enumerate() {
        total = total.checked_add(&sum).ok_or(ChunkOverflow {
            partial: total,
            chunk,
        })?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_matches_checked_mul_i8() {
        for k in i8::MIN..=i8::MAX {
            let bound = MulBound::for_operand(k);
            for v in i8::MIN..=i8::MAX {
                assert_eq!(
                    bound.admits(v),
                    v.checked_mul(k).is_some(),
                    "v = {v}, k = {k}, bound = {bound:?}"
                );
            }
        }
    }

    #[test]
    fn test_bound_matches_checked_mul_u8() {
        for k in u8::MIN..=u8::MAX {
            let bound = MulBound::for_operand(k);
            for v in u8::MIN..=u8::MAX {
                assert_eq!(bound.admits(v), v.checked_mul(k).is_some());
            }
        }
    }

    #[test]
    fn test_bound_shapes() {
        assert_eq!(MulBound::for_operand(0i32), MulBound::Zero);
        assert_eq!(MulBound::for_operand(-1i64), MulBound::NegatesMin);
        assert_eq!(
            MulBound::for_operand(2u8),
            MulBound::Range { lo: 0, hi: 127 }
        );
        assert_eq!(
            MulBound::for_operand(-2i8),
            MulBound::Range { lo: -63, hi: 64 }
        );
        assert_eq!(
            MulBound::for_operand(i64::MIN),
            MulBound::Range { lo: 0, hi: 1 }
        );
    }

    #[test]
    fn test_bound_edges_i64() {
        let bound = MulBound::for_operand(3i64);
        assert!(bound.admits(i64::MAX / 3));
        assert!(!bound.admits(i64::MAX / 3 + 1));
        assert!(bound.admits(i64::MIN / 3));
        assert!(!bound.admits(i64::MIN / 3 - 1));
    }

    #[test]
    fn test_lane_bound_agrees_with_scalar_bound() {
        let values: Vec<i16> = vec![i16::MIN, -16385, -16384, -1, 0, 1, 16383, 16384, i16::MAX];
        for k in [-3i16, -2, -1, 0, 1, 2, 3, i16::MAX, i16::MIN] {
            let bound = MulBound::for_operand(k);
            for &v in &values {
                let lanes = unsafe { bound.broadcast().admits(<i16 as Element>::Vector::splat(v)) };
                assert_eq!(lanes, bound.admits(v), "v = {v}, k = {k}");
            }
        }
    }

    #[test]
    fn test_lane_bound_flags_single_lane() {
        let bound = MulBound::for_operand(-1i32);
        let mut lanes = [7i32; 4];
        unsafe {
            let lane_bound = bound.broadcast();
            assert!(lane_bound.admits(<i32 as Element>::Vector::from_array(&lanes)));
            lanes[3] = i32::MIN;
            assert!(!lane_bound.admits(<i32 as Element>::Vector::from_array(&lanes)));
        }
    }

    #[test]
    fn test_poison_accumulator() {
        unsafe {
            let mut acc = PoisonAccumulator::<f64>::new();
            acc.absorb(<f64 as Element>::Vector::splat(1e300));
            acc.absorb(<f64 as Element>::Vector::splat(-2.5));
            assert!(!acc.is_poisoned());
            assert_eq!(acc.check(), Ok(()));

            acc.absorb(<f64 as Element>::Vector::from_array(&[0.5, f64::INFINITY]));
            acc.absorb(<f64 as Element>::Vector::splat(3.0));
            assert!(acc.is_poisoned());
            assert_eq!(acc.check(), Err(KernelError::NonFinite));
        }
    }

    #[test]
    fn test_poison_survives_zero_results() {
        unsafe {
            let mut acc = PoisonAccumulator::<f32>::new();
            acc.absorb(<f32 as Element>::Vector::from_array(&[f32::NAN, 1.0, 1.0, 1.0]));
            acc.absorb(<f32 as Element>::Vector::splat(0.0));
            assert!(acc.is_poisoned());
        }
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(1.5f32), Ok(1.5));
        assert_eq!(finite(f64::NEG_INFINITY), Err(KernelError::NonFinite));
        assert_eq!(finite(f32::NAN), Err(KernelError::NonFinite));
    }

    #[test]
    fn test_accumulate_chunks() {
        assert_eq!(accumulate_chunks(Vec::<i64>::new()), Ok(0));
        assert_eq!(accumulate_chunks([1i64, 2, 3]), Ok(6));
        assert_eq!(accumulate_chunks([i64::MAX, -1, 1]), Ok(i64::MAX));
    }

    #[test]
    fn test_accumulate_chunks_stops_at_overflowing_chunk() {
        // Narrow accumulator: 100 + 27 fits, the third chunk does not.
        assert_eq!(
            accumulate_chunks([100i8, 27, 1, -50]),
            Err(ChunkOverflow {
                partial: 127,
                chunk: 2
            })
        );
        assert_eq!(
            accumulate_chunks([-100i8, -28, -1]),
            Err(ChunkOverflow {
                partial: -128,
                chunk: 2
            })
        );
        assert_eq!(
            accumulate_chunks([200u8, 55, 1]),
            Err(ChunkOverflow {
                partial: 255,
                chunk: 2
            })
        );
    }

    #[test]
    fn test_accumulate_chunks_at_i64_limits() {
        assert_eq!(
            accumulate_chunks([i64::MAX - 10, 10]),
            Ok(i64::MAX)
        );
        assert_eq!(
            accumulate_chunks([i64::MAX - 10, 11]),
            Err(ChunkOverflow {
                partial: i64::MAX - 10,
                chunk: 1
            })
        );
        assert_eq!(
            accumulate_chunks([u64::MAX, 1]),
            Err(ChunkOverflow {
                partial: u64::MAX,
                chunk: 1
            })
        );
    }
}
