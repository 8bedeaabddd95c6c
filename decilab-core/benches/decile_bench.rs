//! Criterion benchmarks for DecileLab hot paths.
//!
//! Benchmarks:
//! 1. Decile aggregation over presorted populations
//! 2. Full comparator build (sort + aggregate), sequential vs. parallel
//! 3. Cross-run merge over keyed result tables

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use decilab_core::{compute_deciles, CrossRunAverager, KeyedResultRow, MethodComparator};

// ── Helpers ──────────────────────────────────────────────────────────

/// Deterministic pseudo-random bucket sizes with a heavy tail.
fn make_counts(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let r: f64 = rng.gen();
            (1.0 / (1.0 - r * 0.999)).floor()
        })
        .collect()
}

fn make_rows(datasets: usize, sizes: &[i64], offset: f64) -> Vec<KeyedResultRow> {
    let mut rows = Vec::new();
    for d in 0..datasets {
        for &k in sizes {
            rows.push(
                KeyedResultRow::new(format!("dataset_{d}.fa"), k)
                    .with_field("ExecutionTime(ms)", k as f64 * 1.5 + d as f64 + offset)
                    .with_field("Variance", (k * 3) as f64 + offset),
            );
        }
    }
    rows
}

// ── 1. Aggregation ───────────────────────────────────────────────────

fn bench_compute_deciles(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_deciles");
    for n in [1_000usize, 100_000, 1_000_000] {
        let mut values = make_counts(n, 7);
        values.sort_by(f64::total_cmp);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, v| {
            b.iter(|| black_box(compute_deciles(black_box(v))))
        });
    }
    group.finish();
}

// ── 2. Comparator ────────────────────────────────────────────────────

fn bench_comparator(c: &mut Criterion) {
    let methods: Vec<(String, Vec<f64>)> = ["Cyclic", "Identity", "Inverse", "Random", "Zigzag"]
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), make_counts(200_000, i as u64)))
        .collect();

    let mut group = c.benchmark_group("comparator_build");
    group.bench_function("sequential", |b| {
        let cmp = MethodComparator::new().with_parallelism(false);
        b.iter(|| black_box(cmp.build(methods.clone()).unwrap()))
    });
    group.bench_function("parallel", |b| {
        let cmp = MethodComparator::new();
        b.iter(|| black_box(cmp.build(methods.clone()).unwrap()))
    });
    group.finish();
}

// ── 3. Cross-run merge ───────────────────────────────────────────────

fn bench_merge(c: &mut Criterion) {
    let sizes: Vec<i64> = (11..=63).step_by(2).collect();
    let left = make_rows(50, &sizes, 0.0);
    let right = make_rows(50, &sizes, 0.5);
    let averager = CrossRunAverager::with_suffixes("_benchmark", "_hash");

    c.bench_function("cross_run_merge", |b| {
        b.iter(|| black_box(averager.merge(black_box(&left), black_box(&right)).unwrap()))
    });
}

criterion_group!(benches, bench_compute_deciles, bench_comparator, bench_merge);
criterion_main!(benches);
