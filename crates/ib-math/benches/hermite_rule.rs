//! Criterion benchmarks for `ib-math`.
//!
//! Rule construction and scalar Gaussian expectations at typical node counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ib_math::GaussHermiteRule;
use std::num::NonZeroUsize;

fn bench_hermite(c: &mut Criterion) {
    let mut group = c.benchmark_group("gauss_hermite");

    for n in [5usize, 20, 50, 100, 200] {
        let Some(nodes) = NonZeroUsize::new(n) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("rule_new", n), &nodes, |b, &nodes| {
            b.iter(|| black_box(GaussHermiteRule::new(black_box(nodes))));
        });

        let Ok(rule) = GaussHermiteRule::new(nodes) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("expectation_x2", n), &rule, |b, rule| {
            b.iter(|| {
                black_box(rule.gaussian_expectation(black_box(0.5), black_box(1.2), |x| x * x))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hermite);
criterion_main!(benches);
