//! # numkern
//!
//! Bulk numeric kernels over flat slices with a SIMD fast path selected at
//! build time (SSE4.2 on x86_64, NEON on AArch64, portable lanes elsewhere).
//!
//! Every kernel processes the longest register-aligned prefix of its input in
//! 128-bit lane groups and finishes the remainder with scalar code that has
//! the same per-element semantics, so results do not depend on the backend.
//! The one exception is floating point summation, whose reduction order
//! differs from a left-to-right scan.
//!
//! ## Checked and unchecked kernels
//!
//! Operations that can leave the element type's range come in two flavours.
//! The checked kernel returns [`KernelError::Overflow`] for integer results
//! that do not fit, or [`KernelError::NonFinite`] for NaN/infinite float
//! results. The `_unchecked` kernel skips detection; its integer arithmetic
//! wraps.
//!
//! ```
//! use numkern::{mul, BinaryArgs, KernelError};
//!
//! let mut data = [200u8, 3, 4];
//! assert_eq!(
//!     mul(BinaryArgs::ArrayScalarInPlace { data: &mut data, scalar: 2 }),
//!     Err(KernelError::Overflow)
//! );
//!
//! let mut data = [100u8, 3, 4];
//! mul(BinaryArgs::ArrayScalarInPlace { data: &mut data, scalar: 2 }).unwrap();
//! assert_eq!(data, [200, 6, 8]);
//! ```
//!
//! ## Argument shapes
//!
//! Binary kernels accept any of the six shapes of [`BinaryArgs`]: either
//! operand may be a scalar, and the result goes either in place or to a
//! separate output slice.
//!
//! ```
//! use numkern::{aall, findindex, CompareOp};
//!
//! assert!(aall(CompareOp::Gt, &[5i32, 7, 9, 11], 4));
//! assert!(!aall(CompareOp::Gt, &[5i32, 7, 3, 11], 4));
//! assert_eq!(findindex(CompareOp::Le, &[5i32, 7, 3, 11], 4), Some(2));
//! ```

pub mod element;
pub mod error;
pub mod kernels;
pub mod overflow;
pub mod simd;

pub use element::{Element, FloatElement, IntElement, SignedElement};
pub use error::{KernelError, Result};
pub use kernels::angle::{degrees, degrees_unchecked, radians, radians_unchecked};
pub use kernels::asum::{asum, asum_unchecked, Summable};
pub use kernels::bitwise::or;
pub use kernels::ceil::{ceil, ceil_unchecked};
pub use kernels::compare::{aall, aall_array, aany, aany_array, findindex, CompareOp};
pub use kernels::minmax::{amax, amin};
pub use kernels::mul::{mul, mul_unchecked, Multiply};
pub use kernels::neg::{neg, neg_unchecked};
pub use kernels::shift::{shl, shr};
pub use kernels::{BinaryArgs, UnaryArgs};

use simd::traits::SimdVec;

/// Instruction set the kernels were compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// x86_64 SSE4.2
    Sse,
    /// AArch64 NEON
    Neon,
    /// Portable lane arrays, no vector instructions
    Scalar,
}

impl Backend {
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Sse => "sse4.2",
            Backend::Neon => "neon",
            Backend::Scalar => "scalar",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend selected by the build script.
pub const fn backend() -> Backend {
    if cfg!(sse) {
        Backend::Sse
    } else if cfg!(neon) {
        Backend::Neon
    } else {
        Backend::Scalar
    }
}

/// Number of `T` elements processed per vector register.
pub const fn lanes<T: Element>() -> usize {
    <T::Vector as SimdVec<T>>::LANES
}
