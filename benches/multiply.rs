//! Performance benchmarks for the multiply dispatch layer
//!
//! Compares the sequential path against threshold-gated splitting, and the
//! native dense kernel against the generic (boxed-operand) kernels.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use matr::dense::{multiply_both, DenseStore};
use matr::dispatch::THRESHOLD;
use matr::store::Mutate;
use std::hint::black_box;

fn filled(rows: usize, cols: usize) -> DenseStore<f64> {
    let mut store = DenseStore::zeros(rows, cols).unwrap();
    for c in 0..cols {
        for r in 0..rows {
            store.set(r, c, ((r * 31 + c * 7) % 13) as f64 - 6.0);
        }
    }
    store
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_multiply_threshold");

    for &n in &[64usize, 256, 512] {
        let a = filled(n, n);
        let b = filled(n, n);

        group.throughput(Throughput::Elements((n * n * n) as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential", n),
            &(&a, &b),
            |bench, (a, b)| {
                bench.iter(|| black_box(a.multiply_with_threshold(black_box(b), usize::MAX)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("split", n),
            &(&a, &b),
            |bench, (a, b)| {
                bench.iter(|| black_box(a.multiply_with_threshold(black_box(b), THRESHOLD)))
            },
        );
    }

    group.finish();
}

fn bench_generic_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("generic_vs_native");

    let n = 256;
    let a = filled(n, n);
    let b = filled(n, n);

    group.throughput(Throughput::Elements((n * n * n) as u64));
    group.bench_function(BenchmarkId::new("native", n), |bench| {
        bench.iter(|| black_box(a.multiply(black_box(&b))))
    });
    group.bench_function(BenchmarkId::new("boxed_both", n), |bench| {
        bench.iter(|| black_box(multiply_both(black_box(&a), black_box(&b), THRESHOLD)))
    });

    group.finish();
}

criterion_group!(benches, bench_threshold, bench_generic_overhead);
criterion_main!(benches);
