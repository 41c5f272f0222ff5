#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for the batched cross product kernel.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trueno_cross::prelude::*;

fn field(n: usize, phase: f64) -> VectorBuffer {
    let cols: Vec<[f64; 3]> = (0..n)
        .map(|i| {
            let t = i as f64 * 1e-3 + phase;
            [t.sin(), t.cos(), (3.0 * t).sin()]
        })
        .collect();
    VectorBuffer::from_columns(&cols)
}

fn cross_product_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_product");

    for size in [1_000, 10_000, 100_000, 1_000_000] {
        let a = field(size, 0.0);
        let b = field(size, 0.5);
        let mut out = VectorBuffer::zeros(size);
        group.throughput(Throughput::Elements(size as u64));

        for (name, config) in [
            ("scalar", KernelConfig::scalar()),
            ("simd", KernelConfig::default().with_parallel_threshold(usize::MAX)),
            ("auto", KernelConfig::default()),
        ] {
            let kernel = CrossProductKernel::new(config).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bench, _| {
                bench.iter(|| {
                    kernel
                        .apply(black_box(&a.view()), black_box(&b.view()), &mut out.view_mut())
                        .unwrap();
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, cross_product_benchmark);
criterion_main!(benches);
