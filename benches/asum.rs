//! Checked and wrapping summation across element widths

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use numkern::{asum, asum_unchecked};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VECTOR_SIZES: &[usize] = &[1_024, 65_536, 1_048_576, 16_777_216];

macro_rules! bench_width {
    ($fn_name:ident, $t:ty, $label:literal) => {
        fn $fn_name(c: &mut Criterion) {
            let mut rng = StdRng::seed_from_u64(7);
            for &size in VECTOR_SIZES {
                let mut group = c.benchmark_group(format!("Sum {} {}", $label, format_size::<$t>(size)));
                group.throughput(Throughput::Bytes((size * std::mem::size_of::<$t>()) as u64));

                let input: Vec<$t> = (0..size).map(|_| rng.random()).collect();

                group.bench_with_input(BenchmarkId::new("Scalar", size), &input, |b, input| {
                    b.iter(|| {
                        black_box(input.iter().try_fold(0i64, |acc, &x| acc.checked_add(x as i64)))
                    })
                });

                group.bench_with_input(BenchmarkId::new("SIMD checked", size), &input, |b, input| {
                    b.iter(|| black_box(asum(input)))
                });

                group.bench_with_input(BenchmarkId::new("SIMD wrapping", size), &input, |b, input| {
                    b.iter(|| black_box(asum_unchecked(input)))
                });

                group.finish();
            }
        }
    };
}

bench_width!(benchmark_i8, i8, "i8");
bench_width!(benchmark_i16, i16, "i16");
bench_width!(benchmark_i32, i32, "i32");

fn benchmark_f64(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(8);
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Sum f64 {}", format_size::<f64>(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f64>()) as u64));

        let input: Vec<f64> = (0..size).map(|_| rng.random_range(-1.0..1.0)).collect();

        group.bench_with_input(BenchmarkId::new("Scalar", size), &input, |b, input| {
            b.iter(|| black_box(input.iter().sum::<f64>()))
        });

        group.bench_with_input(BenchmarkId::new("SIMD checked", size), &input, |b, input| {
            b.iter(|| black_box(asum(input)))
        });

        group.finish();
    }
}

fn format_size<T>(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<T>();
    if bytes >= 1_048_576 {
        format!("{:.1} MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

criterion_group!(benches, benchmark_i8, benchmark_i16, benchmark_i32, benchmark_f64);
criterion_main!(benches);
