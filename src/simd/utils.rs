use crate::error::Result;
use crate::simd::traits::SimdVec;

/// Largest prefix of `len` that is a whole number of registers.
#[inline(always)]
pub const fn aligned_length(len: usize, lanes: usize) -> usize {
    len - (len % lanes)
}

/// Vector setup only pays off from two full registers onward.
#[inline(always)]
pub const fn simd_worthwhile(len: usize, lanes: usize) -> bool {
    len >= 2 * lanes
}

/// Number of leading elements a kernel processes in whole registers.
///
/// Zero below the worth-it threshold, in which case the whole array goes
/// through the scalar tail.
#[inline(always)]
pub const fn vector_span(len: usize, lanes: usize) -> usize {
    if simd_worthwhile(len, lanes) {
        aligned_length(len, lanes)
    } else {
        0
    }
}

/// Applies `f` lane by lane, stopping at the first failing lane.
///
/// For operations the instruction set lacks, such as checked multiply.
///
/// # Safety
///
/// The backend's instruction set must be available.
#[inline(always)]
pub(crate) unsafe fn try_lanewise<T, V>(a: V, b: V, mut f: impl FnMut(T, T) -> Result<T>) -> Result<V>
where
    T: Copy,
    V: SimdVec<T>,
{
    let mut out = a.to_array();
    let rhs = b.to_array();

    for (lane, &r) in out.as_mut().iter_mut().zip(rhs.as_ref()) {
        *lane = f(*lane, r)?;
    }

    Ok(V::from_array(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_length() {
        assert_eq!(aligned_length(0, 4), 0);
        assert_eq!(aligned_length(3, 4), 0);
        assert_eq!(aligned_length(4, 4), 4);
        assert_eq!(aligned_length(7, 4), 4);
        assert_eq!(aligned_length(33, 16), 32);
    }

    #[test]
    fn test_simd_worthwhile() {
        assert!(!simd_worthwhile(7, 4));
        assert!(simd_worthwhile(8, 4));
        assert!(!simd_worthwhile(31, 16));
        assert!(simd_worthwhile(32, 16));
    }

    #[test]
    fn test_vector_span() {
        assert_eq!(vector_span(5, 4), 0);
        assert_eq!(vector_span(8, 4), 8);
        assert_eq!(vector_span(11, 4), 8);
        assert_eq!(vector_span(47, 16), 32);
    }
}
