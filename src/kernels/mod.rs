//! Kernel entry points and the drivers they share.
//!
//! A binary kernel receives its operands as one of the six [`BinaryArgs`]
//! shapes. The shape is validated and lowered to a [`Plan`]: two operand
//! sources (array or scalar) and one output pointer. A single driver then
//! runs every shape: whole registers over the aligned prefix, with scalar
//! operands broadcast once before the loop, then scalar code over the tail.
//! Unary kernels do the same with [`UnaryArgs`].

use std::marker::PhantomData;

use crate::element::Element;
use crate::error::{check_len, Result};
use crate::lanes;
use crate::simd::traits::SimdVec;
use crate::simd::utils::vector_span;

pub mod angle;
pub mod asum;
pub mod bitwise;
pub mod ceil;
pub mod compare;
pub mod minmax;
pub mod mul;
pub mod neg;
pub mod shift;

/// Operands and destination of a binary kernel.
///
/// `InPlace` shapes overwrite their array operand with the result; the other
/// shapes write to `out`, which must have the same length as the inputs.
#[derive(Debug)]
pub enum BinaryArgs<'a, T> {
    /// `data[i] = data[i] op scalar`
    ArrayScalarInPlace { data: &'a mut [T], scalar: T },
    /// `out[i] = data[i] op scalar`
    ArrayScalar {
        data: &'a [T],
        scalar: T,
        out: &'a mut [T],
    },
    /// `data[i] = scalar op data[i]`
    ScalarArrayInPlace { scalar: T, data: &'a mut [T] },
    /// `out[i] = scalar op data[i]`
    ScalarArray {
        scalar: T,
        data: &'a [T],
        out: &'a mut [T],
    },
    /// `data[i] = data[i] op other[i]`
    ArrayArrayInPlace { data: &'a mut [T], other: &'a [T] },
    /// `out[i] = lhs[i] op rhs[i]`
    ArrayArray {
        lhs: &'a [T],
        rhs: &'a [T],
        out: &'a mut [T],
    },
}

impl<'a, T: Copy> BinaryArgs<'a, T> {
    /// Number of elements the kernel will produce.
    pub fn len(&self) -> usize {
        match self {
            BinaryArgs::ArrayScalarInPlace { data, .. }
            | BinaryArgs::ScalarArrayInPlace { data, .. }
            | BinaryArgs::ArrayArrayInPlace { data, .. } => data.len(),
            BinaryArgs::ArrayScalar { data, .. } | BinaryArgs::ScalarArray { data, .. } => {
                data.len()
            }
            BinaryArgs::ArrayArray { lhs, .. } => lhs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every slice has the first input's length.
    pub(crate) fn plan(self) -> Result<Plan<'a, T>> {
        match self {
            BinaryArgs::ArrayScalarInPlace { data, scalar } => {
                let out = data.as_mut_ptr();
                Ok(Plan::new(Source::Array(out), Source::Scalar(scalar), out, data.len()))
            }
            BinaryArgs::ArrayScalar { data, scalar, out } => {
                check_len(data.len(), out.len())?;
                Ok(Plan::new(
                    Source::Array(data.as_ptr()),
                    Source::Scalar(scalar),
                    out.as_mut_ptr(),
                    data.len(),
                ))
            }
            BinaryArgs::ScalarArrayInPlace { scalar, data } => {
                let out = data.as_mut_ptr();
                Ok(Plan::new(Source::Scalar(scalar), Source::Array(out), out, data.len()))
            }
            BinaryArgs::ScalarArray { scalar, data, out } => {
                check_len(data.len(), out.len())?;
                Ok(Plan::new(
                    Source::Scalar(scalar),
                    Source::Array(data.as_ptr()),
                    out.as_mut_ptr(),
                    data.len(),
                ))
            }
            BinaryArgs::ArrayArrayInPlace { data, other } => {
                check_len(data.len(), other.len())?;
                let out = data.as_mut_ptr();
                Ok(Plan::new(Source::Array(out), Source::Array(other.as_ptr()), out, data.len()))
            }
            BinaryArgs::ArrayArray { lhs, rhs, out } => {
                check_len(lhs.len(), rhs.len())?;
                check_len(lhs.len(), out.len())?;
                Ok(Plan::new(
                    Source::Array(lhs.as_ptr()),
                    Source::Array(rhs.as_ptr()),
                    out.as_mut_ptr(),
                    lhs.len(),
                ))
            }
        }
    }
}

/// One operand of a binary kernel.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source<T> {
    Array(*const T),
    Scalar(T),
}

impl<T: Copy> Source<T> {
    pub(crate) fn scalar(self) -> Option<T> {
        match self {
            Source::Scalar(value) => Some(value),
            Source::Array(_) => None,
        }
    }

    /// # Safety
    ///
    /// `i` must be in bounds of the plan this source belongs to.
    #[inline(always)]
    unsafe fn get(self, i: usize) -> T {
        match self {
            Source::Array(ptr) => *ptr.add(i),
            Source::Scalar(value) => value,
        }
    }
}

impl<T: Element> Source<T> {
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    unsafe fn operand(self) -> Operand<T> {
        match self {
            Source::Array(ptr) => Operand::Array(ptr),
            Source::Scalar(value) => Operand::Splat(T::Vector::splat(value)),
        }
    }
}

/// A [`Source`] ready for the vector loop, scalars already broadcast.
#[derive(Clone, Copy)]
enum Operand<T: Element> {
    Array(*const T),
    Splat(T::Vector),
}

impl<T: Element> Operand<T> {
    /// # Safety
    ///
    /// `i + LANES` must be in bounds of the plan.
    #[inline(always)]
    unsafe fn load(self, i: usize) -> T::Vector {
        match self {
            Operand::Array(ptr) => T::Vector::load(ptr.add(i)),
            Operand::Splat(v) => v,
        }
    }
}

/// A validated binary kernel invocation.
///
/// Array sources and `out` are valid for `len` elements for the lifetime
/// `'a` of the borrowed slices. An in-place source and `out` point to the same
/// slice; the drivers read index `i` before writing it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Plan<'a, T> {
    pub(crate) lhs: Source<T>,
    pub(crate) rhs: Source<T>,
    out: *mut T,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

impl<'a, T: Copy> Plan<'a, T> {
    fn new(lhs: Source<T>, rhs: Source<T>, out: *mut T, len: usize) -> Self {
        Self {
            lhs,
            rhs,
            out,
            len,
            _borrow: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Moves a scalar left operand to the right, for commutative operators.
    pub(crate) fn commuted(self) -> Self {
        match (self.lhs, self.rhs) {
            (Source::Scalar(_), Source::Array(_)) => Self {
                lhs: self.rhs,
                rhs: self.lhs,
                ..self
            },
            _ => self,
        }
    }

    /// Writes `value` to every output element.
    pub(crate) fn fill(&self, value: T) {
        // SAFETY: `out` is valid for `len` writes.
        unsafe { std::slice::from_raw_parts_mut(self.out, self.len) }.fill(value);
    }
}

/// Number of leading elements to run through the vector loop.
#[inline(always)]
pub(crate) fn vector_prefix<T: Element>(kernel: &'static str, len: usize) -> usize {
    let lanes = lanes::<T>();
    let span = vector_span(len, lanes);
    if span == 0 && len > 0 {
        tracing::trace!(kernel, len, lanes, "below vector threshold, scalar only");
    }
    span
}

/// Per-element operator of a binary kernel.
///
/// `vector` and `scalar` must agree lane for lane. Checked operators return
/// an error from either one, or from `finish` when they defer detection to
/// the end of the vector loop.
pub(crate) trait BinaryOp<T: Element> {
    const NAME: &'static str;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn vector(&mut self, lhs: T::Vector, rhs: T::Vector) -> Result<T::Vector>;

    fn scalar(&mut self, lhs: T, rhs: T) -> Result<T>;

    /// Runs after the vector loop, before the tail.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    unsafe fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// # Safety
///
/// The backend's instruction set must be available.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn run_binary<T: Element, O: BinaryOp<T>>(plan: &Plan<'_, T>, op: &mut O) -> Result<()> {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>(O::NAME, plan.len);
    let (lhs, rhs) = (plan.lhs.operand(), plan.rhs.operand());

    let mut i = 0;
    while i < span {
        op.vector(lhs.load(i), rhs.load(i))?.store_at(plan.out.add(i));
        i += lanes;
    }
    op.finish()?;

    for i in span..plan.len {
        *plan.out.add(i) = op.scalar(plan.lhs.get(i), plan.rhs.get(i))?;
    }

    Ok(())
}

/// Runs `op` over a validated plan, logging a failure.
pub(crate) fn execute_binary<T: Element, O: BinaryOp<T>>(plan: &Plan<'_, T>, mut op: O) -> Result<()> {
    // SAFETY: the plan's pointers cover `len` elements, and the build script
    // only enables a backend the target supports.
    unsafe { run_binary(plan, &mut op) }.inspect_err(|err| {
        tracing::debug!(kernel = O::NAME, len = plan.len, error = %err, "kernel failed");
    })
}

/// Validates `args` for `kernel`, logging a rejection.
pub(crate) fn plan_binary<'a, T: Copy>(kernel: &'static str, args: BinaryArgs<'a, T>) -> Result<Plan<'a, T>> {
    args.plan().inspect_err(|err| {
        tracing::debug!(kernel, error = %err, "invalid arguments");
    })
}

pub(crate) fn apply_binary<T: Element, O: BinaryOp<T>>(args: BinaryArgs<'_, T>, op: O) -> Result<()> {
    let plan = plan_binary(O::NAME, args)?;
    execute_binary(&plan, op)
}

/// Operand and destination of a unary kernel.
#[derive(Debug)]
pub enum UnaryArgs<'a, T> {
    /// `data[i] = op(data[i])`
    InPlace(&'a mut [T]),
    /// `out[i] = op(data[i])`
    Copy { data: &'a [T], out: &'a mut [T] },
}

impl<'a, T: Copy> UnaryArgs<'a, T> {
    pub fn len(&self) -> usize {
        match self {
            UnaryArgs::InPlace(data) => data.len(),
            UnaryArgs::Copy { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn plan(self) -> Result<UnaryPlan<'a, T>> {
        let (src, out, len) = match self {
            UnaryArgs::InPlace(data) => {
                let out = data.as_mut_ptr();
                (out as *const T, out, data.len())
            }
            UnaryArgs::Copy { data, out } => {
                check_len(data.len(), out.len())?;
                (data.as_ptr(), out.as_mut_ptr(), data.len())
            }
        };

        Ok(UnaryPlan {
            src,
            out,
            len,
            _borrow: PhantomData,
        })
    }
}

/// A validated unary kernel invocation, see [`Plan`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnaryPlan<'a, T> {
    src: *const T,
    out: *mut T,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

/// Per-element operator of a unary kernel, see [`BinaryOp`].
pub(crate) trait UnaryOp<T: Element> {
    const NAME: &'static str;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn vector(&mut self, v: T::Vector) -> Result<T::Vector>;

    fn scalar(&mut self, v: T) -> Result<T>;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    unsafe fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// # Safety
///
/// The backend's instruction set must be available.
#[cfg_attr(sse, target_feature(enable = "sse4.2"))]
unsafe fn run_unary<T: Element, O: UnaryOp<T>>(plan: &UnaryPlan<'_, T>, op: &mut O) -> Result<()> {
    let lanes = lanes::<T>();
    let span = vector_prefix::<T>(O::NAME, plan.len);

    let mut i = 0;
    while i < span {
        op.vector(T::Vector::load(plan.src.add(i)))?
            .store_at(plan.out.add(i));
        i += lanes;
    }
    op.finish()?;

    for i in span..plan.len {
        *plan.out.add(i) = op.scalar(*plan.src.add(i))?;
    }

    Ok(())
}

pub(crate) fn apply_unary<T: Element, O: UnaryOp<T>>(args: UnaryArgs<'_, T>, mut op: O) -> Result<()> {
    let plan = args.plan().inspect_err(|err| {
        tracing::debug!(kernel = O::NAME, error = %err, "invalid arguments");
    })?;

    // SAFETY: see `execute_binary`.
    unsafe { run_unary(&plan, &mut op) }.inspect_err(|err| {
        tracing::debug!(kernel = O::NAME, len = plan.len, error = %err, "kernel failed");
    })
}
