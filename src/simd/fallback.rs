//! Portable lane groups for targets without a supported instruction set.
//!
//! `Lanes<T, N>` is a plain array that implements the backend traits with
//! scalar code, using the same 128-bit grouping as SSE and NEON so chunking,
//! tails and reduction order are identical on every target. Results are
//! value-identical to the SIMD backends.

use crate::element::{Element, FloatElement, IntElement};
use crate::simd::traits::{SimdBits, SimdFloat, SimdMask, SimdVec, SimdWidenSum};

/// `N` elements of type `T` processed together.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lanes<T, const N: usize>(pub [T; N]);

/// Per-lane comparison result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneMask<const N: usize>(pub [bool; N]);

pub type I8x16 = Lanes<i8, 16>;
pub type U8x16 = Lanes<u8, 16>;
pub type I16x8 = Lanes<i16, 8>;
pub type U16x8 = Lanes<u16, 8>;
pub type I32x4 = Lanes<i32, 4>;
pub type U32x4 = Lanes<u32, 4>;
pub type I64x2 = Lanes<i64, 2>;
pub type U64x2 = Lanes<u64, 2>;
pub type F32x4 = Lanes<f32, 4>;
pub type F64x2 = Lanes<f64, 2>;

impl<const N: usize> SimdMask for LaneMask<N> {
    #[inline(always)]
    unsafe fn all(self) -> bool {
        self.0.iter().all(|&lane| lane)
    }

    #[inline(always)]
    unsafe fn any(self) -> bool {
        self.0.iter().any(|&lane| lane)
    }

    #[inline(always)]
    unsafe fn or(self, rhs: Self) -> Self {
        LaneMask(std::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl<T: Element, const N: usize> Lanes<T, N> {
    #[inline(always)]
    fn compare(self, rhs: Self, f: impl Fn(T, T) -> bool) -> LaneMask<N> {
        LaneMask(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn zip_map(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        Lanes(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        Lanes(self.0.map(f))
    }
}

impl<T: Element, const N: usize> SimdVec<T> for Lanes<T, N> {
    const LANES: usize = N;

    type Mask = LaneMask<N>;

    type Array = [T; N];

    #[inline(always)]
    unsafe fn splat(value: T) -> Self {
        Lanes([value; N])
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        Lanes(std::ptr::read_unaligned(ptr as *const [T; N]))
    }

    #[inline(always)]
    unsafe fn store_at(self, ptr: *mut T) {
        std::ptr::write_unaligned(ptr as *mut [T; N], self.0);
    }

    #[inline(always)]
    unsafe fn to_array(self) -> Self::Array {
        self.0
    }

    #[inline(always)]
    unsafe fn from_array(array: &Self::Array) -> Self {
        Lanes(*array)
    }

    #[inline(always)]
    unsafe fn eq_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a == b)
    }

    #[inline(always)]
    unsafe fn ne_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a != b)
    }

    #[inline(always)]
    unsafe fn lt_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a < b)
    }

    #[inline(always)]
    unsafe fn le_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a <= b)
    }

    #[inline(always)]
    unsafe fn gt_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a > b)
    }

    #[inline(always)]
    unsafe fn ge_elements(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a >= b)
    }

    #[inline(always)]
    unsafe fn min_elements(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::min_lane)
    }

    #[inline(always)]
    unsafe fn max_elements(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::max_lane)
    }

    #[inline(always)]
    unsafe fn add_elements(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::add_lane)
    }

    #[inline(always)]
    unsafe fn mul_elements(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::mul_lane)
    }

    #[inline(always)]
    unsafe fn neg_elements(self) -> Self {
        self.map(T::neg_lane)
    }
}

impl<T: IntElement, const N: usize> SimdBits<T> for Lanes<T, N> {
    #[inline(always)]
    unsafe fn or_elements(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a | b)
    }

    #[inline(always)]
    unsafe fn shl_elements(self, count: u32) -> Self {
        self.map(|a| a << count as usize)
    }

    #[inline(always)]
    unsafe fn shr_elements(self, count: u32) -> Self {
        self.map(|a| a >> count as usize)
    }
}

impl<T: FloatElement, const N: usize> SimdFloat<T> for Lanes<T, N> {
    #[inline(always)]
    unsafe fn ceil_elements(self) -> Self {
        self.map(T::ceil)
    }
}

// Adjacent lanes are summed pairwise into one wide lane.
macro_rules! widen_lanes {
    ($t:ty, $n:expr, $wide:ty, $wn:expr) => {
        impl SimdWidenSum<$t> for Lanes<$t, $n> {
            type Wide = $wide;

            type Partial = Lanes<$wide, $wn>;

            #[inline(always)]
            unsafe fn zero_partial() -> Self::Partial {
                Lanes([0; $wn])
            }

            #[inline(always)]
            unsafe fn widen_add(self, acc: Self::Partial) -> Self::Partial {
                Lanes(std::array::from_fn(|j| {
                    acc.0[j]
                        .wrapping_add(self.0[2 * j] as $wide)
                        .wrapping_add(self.0[2 * j + 1] as $wide)
                }))
            }
        }
    };
}

widen_lanes!(i8, 16, i16, 8);
widen_lanes!(u8, 16, u16, 8);
widen_lanes!(i16, 8, i32, 4);
widen_lanes!(u16, 8, u32, 4);
widen_lanes!(i32, 4, i64, 2);
widen_lanes!(u32, 4, u64, 2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_roundtrip_unaligned() {
        let data: Vec<i16> = (0..9).collect();
        let v = unsafe { Lanes::<i16, 8>::load(data[1..].as_ptr()) };
        assert_eq!(v.0, [1, 2, 3, 4, 5, 6, 7, 8]);

        let mut out = [0i16; 9];
        unsafe { v.store_at(out[1..].as_mut_ptr()) };
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_mask_reductions() {
        let a = Lanes([1u32, 2, 3, 4]);
        let b = Lanes([1u32, 5, 3, 0]);
        unsafe {
            assert!(!a.eq_elements(b).all());
            assert!(a.eq_elements(b).any());
            assert!(a.eq_elements(a).all());
            assert!(!a.ne_elements(a).any());
            assert!(a.lt_elements(b).or(a.gt_elements(b)).any());
        }
    }

    #[test]
    fn test_shifts_follow_sign() {
        let v = Lanes([-128i8; 16]);
        unsafe {
            assert_eq!(v.shr_elements(7).0, [-1i8; 16]);
            assert_eq!(v.shl_elements(1).0, [0i8; 16]);
        }
        let u = Lanes([0x80u8; 16]);
        unsafe {
            assert_eq!(u.shr_elements(7).0, [1u8; 16]);
        }
    }

    #[test]
    fn test_widen_add_holds_a_full_chunk() {
        let v = Lanes([i8::MIN; 16]);
        let mut acc = unsafe { Lanes::<i8, 16>::zero_partial() };
        for _ in 0..16 {
            acc = unsafe { v.widen_add(acc) };
        }
        assert_eq!(acc.0, [-128 * 32; 8]);
    }
}
