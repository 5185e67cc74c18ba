//! Statistical test benchmarks
//!
//! Measures the three two-sample tests and the full decision procedure on
//! sample sizes typical of benchmark runs (tens to thousands of timings).
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench statistical_tests
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use perflogic::comparison::decide;
use perflogic::formula::Sign;
use perflogic::statistics::{kolmogorov_smirnov, mann_whitney_u, welch_t_test, TestKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Timings around `center` with roughly 5% jitter
fn timings(rng: &mut StdRng, center: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| center * (1.0 + rng.gen_range(-0.05..0.05)))
        .collect()
}

fn bench_tests(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = c.benchmark_group("two_sample_tests");

    for n in [10usize, 100, 1000, 10_000] {
        let left = timings(&mut rng, 100.0, n);
        let right = timings(&mut rng, 104.0, n);

        group.bench_with_input(BenchmarkId::new("welch_t_test", n), &n, |b, _| {
            b.iter(|| black_box(welch_t_test(black_box(&left), black_box(&right))));
        });
        group.bench_with_input(BenchmarkId::new("mann_whitney_u", n), &n, |b, _| {
            b.iter(|| black_box(mann_whitney_u(black_box(&left), black_box(&right))));
        });
        group.bench_with_input(BenchmarkId::new("kolmogorov_smirnov", n), &n, |b, _| {
            b.iter(|| black_box(kolmogorov_smirnov(black_box(&left), black_box(&right))));
        });
    }

    group.finish();
}

/// Equality runs two one-sided tests, so it is the most expensive sign
fn bench_decide_equality(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let left = timings(&mut rng, 100.0, 1000);
    let right = timings(&mut rng, 101.0, 1000);

    c.bench_function("decide_equality_all_tests_1000", |b| {
        b.iter(|| {
            for test in TestKind::ALL {
                black_box(decide(
                    test,
                    Sign::Eq,
                    black_box(&left),
                    black_box(&right),
                    0.05,
                    0.05,
                ));
            }
        });
    });
}

criterion_group!(benches, bench_tests, bench_decide_equality);
criterion_main!(benches);
