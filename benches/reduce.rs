//! Timing comparison of the reduction strategies.
//!
//! Every strategy sums the sequence `1, 2, ..., len`. The input lengths
//! can be overridden with `TREE_REDUCE_BENCH_LENS` (comma separated).

use std::env;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tree_reduce::{ParallelReducer, SerialReducer};

const DEFAULT_LENS: &[usize] = &[1024, 65_536, 4_194_304];

fn lens() -> Vec<usize> {
    env::var("TREE_REDUCE_BENCH_LENS")
        .ok()
        .map(|lens| {
            lens.split(',')
                .filter_map(|len| len.trim().parse().ok())
                .collect::<Vec<usize>>()
        })
        .filter(|lens| !lens.is_empty())
        .unwrap_or_else(|| DEFAULT_LENS.to_vec())
}

fn sequence(len: usize) -> Vec<f32> {
    (1..=len).map(|i| i as f32).collect()
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_sum");

    for len in lens() {
        let data = sequence(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("serial", len), &data, |b, data| {
            b.iter(|| SerialReducer::reduce(black_box(data), |a, b| a + b))
        });

        for &workers in &[2, 4, 8] {
            let executor = ParallelReducer::new(workers);

            group.bench_with_input(
                BenchmarkId::new(format!("parallel_{}", workers), len),
                &data,
                |b, data| b.iter(|| executor.reduce(black_box(data), |a, b| a + b).unwrap()),
            );
        }

        #[cfg(feature = "rayon-executor")]
        {
            let executor = tree_reduce::RayonReducer::default();

            group.bench_with_input(BenchmarkId::new("rayon", len), &data, |b, data| {
                b.iter(|| executor.reduce(black_box(data), |a, b| a + b).unwrap())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_reduce);
criterion_main!(benches);
