//! Lane-group interface shared by every backend.
//!
//! A backend provides one 128-bit lane type per element type and implements
//! these traits for it. The kernels in [`crate::kernels`] are written once
//! against this interface, so SSE, NEON and the portable fallback run the
//! exact same algorithm.
//!
//! Every method is `unsafe` because backends are thin wrappers over
//! `std::arch` intrinsics. Callers must only use a backend on a CPU that
//! supports it, which the build script guarantees.

/// Per-lane boolean result of a vector comparison.
pub trait SimdMask: Copy {
    /// True when every lane matched.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn all(self) -> bool;

    /// True when at least one lane matched.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn any(self) -> bool;

    /// Lane-wise OR of two masks.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn or(self, rhs: Self) -> Self;
}

/// A register holding `LANES` elements of type `T`.
///
/// Integer arithmetic wraps on overflow, matching the `*_lane` helpers of
/// [`crate::Element`]. Comparisons return IEEE results for floats (any
/// comparison with NaN is false, except `ne`).
pub trait SimdVec<T: Copy>: Copy {
    /// Number of elements in one register.
    const LANES: usize;

    /// Result type of the comparison methods.
    type Mask: SimdMask;

    /// Stack array with one slot per lane, used for lane-collapse.
    type Array: Copy + AsRef<[T]> + AsMut<[T]>;

    /// Fills every lane with `value`.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn splat(value: T) -> Self;

    /// Reads `LANES` contiguous elements, no alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr..ptr + LANES` must be valid for reads.
    unsafe fn load(ptr: *const T) -> Self;

    /// Writes `LANES` contiguous elements, no alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr..ptr + LANES` must be valid for writes.
    unsafe fn store_at(self, ptr: *mut T);

    /// Copies the lanes out to a stack array.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn to_array(self) -> Self::Array;

    /// Builds a register from a stack array.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    #[inline(always)]
    unsafe fn from_array(array: &Self::Array) -> Self {
        Self::load(array.as_ref().as_ptr())
    }

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn eq_elements(self, rhs: Self) -> Self::Mask;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn ne_elements(self, rhs: Self) -> Self::Mask;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn lt_elements(self, rhs: Self) -> Self::Mask;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn le_elements(self, rhs: Self) -> Self::Mask;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn gt_elements(self, rhs: Self) -> Self::Mask;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn ge_elements(self, rhs: Self) -> Self::Mask;

    /// Lane-wise `if a < b { a } else { b }`.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn min_elements(self, rhs: Self) -> Self;

    /// Lane-wise `if a > b { a } else { b }`.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn max_elements(self, rhs: Self) -> Self;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn add_elements(self, rhs: Self) -> Self;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn mul_elements(self, rhs: Self) -> Self;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn neg_elements(self) -> Self;
}

/// Bitwise operations on integer lanes.
pub trait SimdBits<T: Copy>: SimdVec<T> {
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn or_elements(self, rhs: Self) -> Self;

    /// Shifts every lane left by `count`.
    ///
    /// # Safety
    ///
    /// `count` must be below the lane bit width.
    unsafe fn shl_elements(self, count: u32) -> Self;

    /// Shifts every lane right by `count`: arithmetic for signed lanes,
    /// logical for unsigned lanes.
    ///
    /// # Safety
    ///
    /// `count` must be below the lane bit width.
    unsafe fn shr_elements(self, count: u32) -> Self;
}

/// Rounding on floating point lanes.
pub trait SimdFloat<T: Copy>: SimdVec<T> {
    /// Rounds every lane toward positive infinity.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn ceil_elements(self) -> Self;
}

/// Widening accumulation used by the chunked integer summation.
///
/// Each call adds all lanes of `self` into a register of lanes twice as wide
/// (`i8` into `i16`, `u16` into `u32`, `i32` into `i64`, ...). A partial
/// register can absorb one full summation chunk without overflowing.
pub trait SimdWidenSum<T: Copy>: SimdVec<T> {
    /// Element type of the partial sums.
    type Wide: Copy;

    /// Register of partial sums.
    type Partial: SimdVec<Self::Wide>;

    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn zero_partial() -> Self::Partial;

    /// Adds every lane of `self` into `acc`.
    ///
    /// # Safety
    ///
    /// The backend's instruction set must be available.
    unsafe fn widen_add(self, acc: Self::Partial) -> Self::Partial;
}
