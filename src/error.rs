//! Error types for numkern kernels.
//!
//! Every kernel that can fail reports the failure as a value. Overflow and
//! non-finite results are properties of the data, so calling the same checked
//! kernel again on the same inputs reproduces the same error.

use thiserror::Error;

/// Result type for numkern kernels
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors that can occur while running a kernel
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// An integer result does not fit the element type
    #[error("arithmetic overflow")]
    Overflow,

    /// A floating point result is NaN or infinite
    #[error("non-finite floating point result")]
    NonFinite,

    /// A second input or the output does not match the first input's length
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the first input array
        expected: usize,
        /// Length of the offending array
        actual: usize,
    },

    /// Reduction over an empty array that has no identity value
    #[error("Empty input array")]
    EmptyInput,

    /// Shift count is negative or not below the element bit width
    #[error("Invalid shift count {count} for {bits}-bit elements")]
    InvalidShift {
        /// Requested shift count
        count: i128,
        /// Bit width of the element type
        bits: u32,
    },
}

/// Returns `LengthMismatch` unless both lengths agree.
#[inline]
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(KernelError::LengthMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_display() {
        assert_eq!(KernelError::Overflow.to_string(), "arithmetic overflow");
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = KernelError::LengthMismatch {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Length mismatch: expected 10, got 5");
    }

    #[test]
    fn test_invalid_shift_display() {
        let err = KernelError::InvalidShift { count: 9, bits: 8 };
        assert_eq!(err.to_string(), "Invalid shift count 9 for 8-bit elements");
    }

    #[test]
    fn test_check_len() {
        assert_eq!(check_len(4, 4), Ok(()));
        assert_eq!(
            check_len(4, 3),
            Err(KernelError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
