//! End-to-end runs: scatter, N generations of exchange and update, gather.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use strata_bench::{reference_profile, seeded_simulation};
use strata_engine::{KernelMode, SimConfig};

fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_profile_workers");
    group.sample_size(20);
    for workers in [1usize, 2, 4, 8] {
        let config = SimConfig {
            workers,
            ..reference_profile()
        };
        group.bench_with_input(BenchmarkId::from_parameter(workers), &config, |b, config| {
            b.iter_batched(
                || seeded_simulation(config.clone(), 30, 42),
                |sim| black_box(sim.run().unwrap()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_gather_cadence(c: &mut Criterion) {
    let mut group = c.benchmark_group("gather_cadence");
    group.sample_size(20);
    for every in [None, Some(10), Some(1)] {
        let config = SimConfig {
            gather_every: every,
            kernel: KernelMode::Serial,
            ..reference_profile()
        };
        let label = every.map_or("final".to_string(), |k| k.to_string());
        group.bench_with_input(BenchmarkId::from_parameter(label), &config, |b, config| {
            b.iter_batched(
                || seeded_simulation(config.clone(), 30, 42),
                |sim| black_box(sim.run().unwrap()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_worker_scaling, bench_gather_cadence);
criterion_main!(benches);
