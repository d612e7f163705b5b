//! Comparison reductions: `aall`, `aany` and `findindex`.
//!
//! Each vector iteration compares one register and collapses the lane mask
//! to a single bool. `aall` stops at the first register with a failing lane,
//! `aany` at the first with a matching lane. `findindex` rescans the matching
//! register element by element to locate the first match.

use crate::element::Element;
use crate::error::{check_len, Result};
use crate::kernels::vector_prefix;
use crate::lanes;
use crate::simd::traits::{SimdMask, SimdVec};

/// Relation tested between each element and the second operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// `a OP b` with IEEE semantics: every relation involving NaN is false
    /// except `Ne`.
    #[inline]
    pub fn holds<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

type Mask<T> = <<T as Element>::Vector as SimdVec<T>>::Mask;

/// A [`CompareOp`] fixed at compile time, so the loops carry no dispatch.
trait Relation {
    /// Lane-wise `a OP b`.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn lanes<T: Element>(a: T::Vector, b: T::Vector) -> Mask<T>;

    fn holds<T: PartialOrd>(a: T, b: T) -> bool;
}

macro_rules! relation {
    ($name:ident, $op:ident, $method:ident) => {
        struct $name;

        impl Relation for $name {
            #[inline(always)]
            unsafe fn lanes<T: Element>(a: T::Vector, b: T::Vector) -> Mask<T> {
                a.$method(b)
            }

            #[inline(always)]
            fn holds<T: PartialOrd>(a: T, b: T) -> bool {
                CompareOp::$op.holds(a, b)
            }
        }
    };
}

relation!(Equal, Eq, eq_elements);
relation!(NotEqual, Ne, ne_elements);
relation!(Less, Lt, lt_elements);
relation!(LessEqual, Le, le_elements);
relation!(Greater, Gt, gt_elements);
relation!(GreaterEqual, Ge, ge_elements);

macro_rules! with_relation {
    ($op:expr, $r:ident => $body:expr) => {
        match $op {
            CompareOp::Eq => {
                type $r = Equal;
                $body
            }
            CompareOp::Ne => {
                type $r = NotEqual;
                $body
            }
            CompareOp::Lt => {
                type $r = Less;
                $body
            }
            CompareOp::Le => {
                type $r = LessEqual;
                $body
            }
            CompareOp::Gt => {
                type $r = Greater;
                $body
            }
            CompareOp::Ge => {
                type $r = GreaterEqual;
                $body
            }
        }
    };
}

/// Where the right-hand operand of each comparison comes from.
#[derive(Clone, Copy)]
enum Rhs<'a, T> {
    Scalar(T),
    Array(&'a [T]),
}

impl<T: Element> Rhs<'_, T> {
    #[inline(always)]
    unsafe fn register(&self, splat: T::Vector, i: usize) -> T::Vector {
        match self {
            Rhs::Scalar(_) => splat,
            Rhs::Array(rhs) => T::Vector::load(rhs.as_ptr().add(i)),
        }
    }

    #[inline(always)]
    fn get(&self, i: usize) -> T {
        match self {
            Rhs::Scalar(value) => *value,
            Rhs::Array(rhs) => rhs[i],
        }
    }

    #[inline(always)]
    unsafe fn splat(&self) -> T::Vector {
        match self {
            Rhs::Scalar(value) => T::Vector::splat(*value),
            Rhs::Array(_) => T::Vector::splat(T::ZERO),
        }
    }
}

/// # Safety
///
/// The backend's instruction set must be available. An array `rhs` has
/// `data.len()` elements.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn all_of<T: Element, R: Relation>(data: &[T], rhs: Rhs<'_, T>) -> bool {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>("aall", data.len());
    let splat = rhs.splat();

    let mut i = 0;
    while i < span {
        let lhs = T::Vector::load(data.as_ptr().add(i));
        if !R::lanes::<T>(lhs, rhs.register(splat, i)).all() {
            return false;
        }
        i += lanes;
    }

    (span..data.len()).all(|i| R::holds(data[i], rhs.get(i)))
}

/// # Safety
///
/// See [`all_of`].
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn first_match<T: Element, R: Relation>(
    kernel: &'static str,
    data: &[T],
    rhs: Rhs<'_, T>,
) -> Option<usize> {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>(kernel, data.len());
    let splat = rhs.splat();

    let mut i = 0;
    while i < span {
        let lhs = T::Vector::load(data.as_ptr().add(i));
        if R::lanes::<T>(lhs, rhs.register(splat, i)).any() {
            if let Some(at) = (i..i + lanes).find(|&j| R::holds(data[j], rhs.get(j))) {
                return Some(at);
            }
        }
        i += lanes;
    }

    (span..data.len()).find(|&i| R::holds(data[i], rhs.get(i)))
}

/// True when `data[i] OP param` holds for every element; true for `[]`.
///
/// ```
/// use numkern::{aall, CompareOp};
///
/// assert!(aall(CompareOp::Ge, &[3u16; 40], 3));
/// assert!(aall::<f64>(CompareOp::Lt, &[], 0.0));
/// ```
pub fn aall<T: Element>(op: CompareOp, data: &[T], param: T) -> bool {
    // SAFETY: the build script only enables a backend the target supports.
    with_relation!(op, R => unsafe { all_of::<T, R>(data, Rhs::Scalar(param)) })
}

/// True when `lhs[i] OP rhs[i]` holds for every index.
pub fn aall_array<T: Element>(op: CompareOp, lhs: &[T], rhs: &[T]) -> Result<bool> {
    check_len(lhs.len(), rhs.len())?;
    // SAFETY: lengths checked above.
    Ok(with_relation!(op, R => unsafe { all_of::<T, R>(lhs, Rhs::Array(rhs)) }))
}

/// True when `data[i] OP param` holds for at least one element; false for `[]`.
pub fn aany<T: Element>(op: CompareOp, data: &[T], param: T) -> bool {
    // SAFETY: the build script only enables a backend the target supports.
    let found = with_relation!(op, R => unsafe {
        first_match::<T, R>("aany", data, Rhs::Scalar(param))
    });
    found.is_some()
}

/// True when `lhs[i] OP rhs[i]` holds for at least one index.
pub fn aany_array<T: Element>(op: CompareOp, lhs: &[T], rhs: &[T]) -> Result<bool> {
    check_len(lhs.len(), rhs.len())?;
    // SAFETY: lengths checked above.
    let found = with_relation!(op, R => unsafe {
        first_match::<T, R>("aany", lhs, Rhs::Array(rhs))
    });
    Ok(found.is_some())
}

/// Index of the first element with `data[i] OP param`.
///
/// ```
/// use numkern::{findindex, CompareOp};
///
/// let data: Vec<i8> = (0..50).collect();
/// assert_eq!(findindex(CompareOp::Eq, &data, 37), Some(37));
/// assert_eq!(findindex(CompareOp::Gt, &data, 49), None);
/// ```
pub fn findindex<T: Element>(op: CompareOp, data: &[T], param: T) -> Option<usize> {
    // SAFETY: the build script only enables a backend the target supports.
    with_relation!(op, R => unsafe {
        first_match::<T, R>("findindex", data, Rhs::Scalar(param))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPS: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    #[test]
    fn test_holds_with_nan() {
        for op in OPS {
            assert_eq!(op.holds(f32::NAN, 1.0), op == CompareOp::Ne, "{}", op.symbol());
        }
    }

    #[test]
    fn test_short_circuit_positions() {
        // A violation in the first register, the last register and the tail.
        for at in [0usize, 15, 16, 31, 32, 40] {
            let mut data = vec![10u8; 41];
            data[at] = 1;
            assert!(!aall(CompareOp::Gt, &data, 5), "violation at {at}");
            assert_eq!(findindex(CompareOp::Lt, &data, 5), Some(at));
        }
    }

    #[test]
    fn test_first_of_several_matches() {
        let mut data = vec![0i64; 9];
        data[3] = 1;
        data[4] = 1;
        data[8] = 1;
        assert_eq!(findindex(CompareOp::Eq, &data, 1), Some(3));
    }

    #[test]
    fn test_nan_lanes_match_scalar() {
        let data = [1.0f32, f32::NAN, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        for op in OPS {
            let naive = data.iter().all(|&x| op.holds(x, 1.0));
            assert_eq!(aall(op, &data, 1.0), naive, "{}", op.symbol());
            let naive = data.iter().position(|&x| op.holds(x, f32::NAN));
            assert_eq!(findindex(op, &data, f32::NAN), naive, "{}", op.symbol());
        }
    }

    #[test]
    fn test_array_forms() {
        let lhs = [1i32, 2, 3, 4, 5, 6, 7, 8, 9];
        let rhs = [1i32, 2, 3, 4, 5, 6, 7, 8, 10];
        assert_eq!(aall_array(CompareOp::Le, &lhs, &rhs), Ok(true));
        assert_eq!(aall_array(CompareOp::Eq, &lhs, &rhs), Ok(false));
        assert_eq!(aany_array(CompareOp::Lt, &lhs, &rhs), Ok(true));
        assert_eq!(aany_array(CompareOp::Gt, &lhs, &rhs), Ok(false));
        assert!(aall_array(CompareOp::Eq, &lhs, &rhs[1..]).is_err());
        assert!(aany_array(CompareOp::Eq, &lhs[1..], &rhs).is_err());
    }
}
