//! Benchmarks for the free-time and fixed-time solvers.
//!
//! Run with: cargo bench --bench solver_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use otg_motion::{second_order, third_order, KinematicLimits, KinematicState};
use std::hint::black_box;

fn scenarios() -> [(&'static str, KinematicState, KinematicState); 3] {
    [
        ("rest_to_rest", KinematicState::at_rest(0.0), KinematicState::at_rest(10.0)),
        (
            "moving",
            KinematicState::new(-1.0, 2.0, 1.5),
            KinematicState::new(4.0, -1.0, 0.5),
        ),
        (
            "reversing",
            KinematicState::new(0.0, -1.0, 0.0),
            KinematicState::new(-1.0, -1.0, 0.0),
        ),
    ]
}

fn bench_third_order(c: &mut Criterion) {
    let limits = KinematicLimits::symmetric(5.0, 5.0, 10.0);
    let mut group = c.benchmark_group("third_order");

    for (name, start, goal) in scenarios() {
        group.bench_with_input(BenchmarkId::new("step1", name), &(start, goal), |b, (start, goal)| {
            b.iter(|| third_order::Step1::new(black_box(start), black_box(goal), &limits).get_profile())
        });

        let Some(block) = third_order::Step1::new(&start, &goal, &limits).get_profile() else {
            continue;
        };
        let tf = 1.5 * block.t_min;
        group.bench_with_input(BenchmarkId::new("step2", name), &(start, goal), |b, (start, goal)| {
            b.iter(|| third_order::Step2::new(black_box(start), black_box(goal), &limits, tf).get_profile())
        });
    }
    group.finish();
}

fn bench_second_order(c: &mut Criterion) {
    let limits = KinematicLimits::symmetric(5.0, 5.0, 0.0);
    let start = KinematicState::new(0.0, 1.0, 0.0);
    let goal = KinematicState::new(5.0, -1.0, 0.0);

    c.bench_function("second_order/step1", |b| {
        b.iter(|| second_order::Step1::new(black_box(&start), black_box(&goal), &limits).get_profile())
    });
    c.bench_function("second_order/step2", |b| {
        b.iter(|| second_order::Step2::new(black_box(&start), black_box(&goal), &limits, 4.0).get_profile())
    });
}

criterion_group!(benches, bench_third_order, bench_second_order);
criterion_main!(benches);
