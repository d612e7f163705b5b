//! Negation, degree/radian conversion and ceiling against scalar references.

use numkern::{
    ceil, ceil_unchecked, degrees, degrees_unchecked, neg, neg_unchecked, radians,
    radians_unchecked, FloatElement, KernelError, UnaryArgs,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_LEN: usize = 3 * 16 + 1;

fn bits_eq_f32(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn bits_eq_f64(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

macro_rules! neg_int_suite {
    ($name:ident, $t:ty) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64(8);
            for len in 0..=MAX_LEN {
                let data: Vec<$t> = (0..len).map(|_| rng.random_range(<$t>::MIN + 1..=<$t>::MAX)).collect();
                let expected: Vec<$t> = data.iter().map(|&x| -x).collect();

                let mut out = vec![0; len];
                neg(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                assert_eq!(out, expected);

                let mut in_place = data.clone();
                neg_unchecked(UnaryArgs::InPlace(&mut in_place)).unwrap();
                assert_eq!(in_place, expected);

                // MIN has no negation, wherever it sits.
                for at in [0, len / 2, len.wrapping_sub(1)] {
                    if at >= len {
                        continue;
                    }
                    let mut data = data.clone();
                    data[at] = <$t>::MIN;
                    for _ in 0..2 {
                        assert_eq!(
                            neg(UnaryArgs::Copy { data: &data, out: &mut out }),
                            Err(KernelError::Overflow),
                            "MIN at {at} of {len}"
                        );
                    }
                    neg_unchecked(UnaryArgs::InPlace(&mut data)).unwrap();
                    assert_eq!(data[at], <$t>::MIN);
                }
            }
        }
    };
}

neg_int_suite!(test_neg_i8, i8);
neg_int_suite!(test_neg_i16, i16);
neg_int_suite!(test_neg_i32, i32);
neg_int_suite!(test_neg_i64, i64);

#[test]
fn test_neg_boundary() {
    let mut data = [i32::MIN + 1, i32::MAX, 0, -1];
    neg(UnaryArgs::InPlace(&mut data)).unwrap();
    assert_eq!(data, [i32::MAX, i32::MIN + 1, 0, 1]);
}

macro_rules! float_suite {
    ($name:ident, $non_finite:ident, $t:ty, $bits_eq:ident) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64(9);
            for len in 0..=MAX_LEN {
                let data: Vec<$t> = (0..len).map(|_| rng.random_range(-720.0..720.0)).collect();

                let mut out = vec![0.0; len];
                neg(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                let expected: Vec<$t> = data.iter().map(|&x| -x).collect();
                assert!($bits_eq(&out, &expected));

                degrees(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                let expected: Vec<$t> = data.iter().map(|&x| x * <$t>::DEGREES_PER_RADIAN).collect();
                assert!($bits_eq(&out, &expected));
                degrees_unchecked(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                assert!($bits_eq(&out, &expected));

                let mut in_place = data.clone();
                radians(UnaryArgs::InPlace(&mut in_place)).unwrap();
                let expected: Vec<$t> = data.iter().map(|&x| x * <$t>::RADIANS_PER_DEGREE).collect();
                assert!($bits_eq(&in_place, &expected));
                let mut in_place = data.clone();
                radians_unchecked(UnaryArgs::InPlace(&mut in_place)).unwrap();
                assert!($bits_eq(&in_place, &expected));

                ceil(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                let expected: Vec<$t> = data.iter().map(|&x| x.ceil()).collect();
                assert!($bits_eq(&out, &expected), "{data:?}");
                let mut in_place = data.clone();
                ceil_unchecked(UnaryArgs::InPlace(&mut in_place)).unwrap();
                assert!($bits_eq(&in_place, &expected));
            }
        }

        #[test]
        fn $non_finite() {
            for len in [1usize, 5, 8, 9, 17, MAX_LEN] {
                for at in [0, len / 2, len - 1, len - len % 4] {
                    if at >= len {
                        continue;
                    }
                    for bad in [<$t>::INFINITY, <$t>::NEG_INFINITY, <$t>::NAN] {
                        let mut data = vec![0.25 as $t; len];
                        data[at] = bad;
                        let mut out = vec![0.0; len];

                        for _ in 0..2 {
                            assert_eq!(
                                ceil(UnaryArgs::Copy { data: &data, out: &mut out }),
                                Err(KernelError::NonFinite),
                                "ceil {bad} at {at} of {len}"
                            );
                            assert_eq!(
                                radians(UnaryArgs::Copy { data: &data, out: &mut out }),
                                Err(KernelError::NonFinite)
                            );
                        }
                        ceil_unchecked(UnaryArgs::Copy { data: &data, out: &mut out }).unwrap();
                        assert!(!out[at].is_finite());
                        if len > 1 {
                            assert_eq!(out[(at + 1) % len], 1.0);
                        }
                    }

                    // Finite input whose conversion overflows.
                    let mut data = vec![1.0 as $t; len];
                    data[at] = <$t>::MAX;
                    assert_eq!(degrees(UnaryArgs::InPlace(&mut data)), Err(KernelError::NonFinite));
                    let mut data = vec![1.0 as $t; len];
                    data[at] = <$t>::MAX;
                    degrees_unchecked(UnaryArgs::InPlace(&mut data)).unwrap();
                    assert!(data[at].is_infinite());
                }
            }
        }
    };
}

float_suite!(test_float_unary_f32, test_float_non_finite_f32, f32, bits_eq_f32);
float_suite!(test_float_unary_f64, test_float_non_finite_f64, f64, bits_eq_f64);

#[test]
fn test_unary_length_mismatch() {
    let data = [1.0f32; 4];
    let mut out = [0.0f32; 3];
    assert_eq!(
        ceil(UnaryArgs::Copy { data: &data, out: &mut out }),
        Err(KernelError::LengthMismatch { expected: 4, actual: 3 })
    );
}
