//! Criterion benchmarks for u-tsp heuristics.
//!
//! Uses seeded random instances on a 1000x1000 grid.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_tsp::aco::{AcoConfig, AcoRunner};
use u_tsp::graph::GraphProblem;
use u_tsp::hc::{HcConfig, HcRunner};
use u_tsp::moves::{generate, Descent, MoveKind};
use u_tsp::nn::{NnConfig, NnRunner};
use u_tsp::random::create_rng;
use u_tsp::sa::{CoolingSchedule, InitialTemperature, SaConfig, SaRunner};

fn instance(count: usize) -> GraphProblem {
    let mut rng = create_rng(Some(42));
    GraphProblem::random(1000, 1000, count, &mut rng).expect("grid holds every node")
}

// ===========================================================================
// Move generation
// ===========================================================================

fn bench_steepest_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("steepest_scan");
    for &n in &[50, 100, 200] {
        let tour = instance(n).ordered();
        for kind in [MoveKind::Swap, MoveKind::TwoOpt] {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), n), &tour, |b, t| {
                let mut rng = create_rng(Some(1));
                b.iter(|| {
                    let mv = generate(black_box(t), kind, Descent::Steepest, &mut rng);
                    black_box(mv.map(|m| m.delta()))
                })
            });
        }
    }
    group.finish();
}

// ===========================================================================
// Drivers
// ===========================================================================

fn bench_nn_multi_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("nn_multi_start");
    group.sample_size(10);
    for &n in &[50, 100, 200] {
        let problem = instance(n);
        let config = NnConfig::default().with_multi_start(true);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(NnRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

fn bench_hc_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("hc_two_opt");
    group.sample_size(10);
    for &n in &[30, 60] {
        let problem = instance(n);
        let config = HcConfig::default().with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(HcRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);
    for &n in &[50, 100] {
        let problem = instance(n);
        let config = SaConfig::default()
            .with_initial_temperature(InitialTemperature::Fixed(500.0))
            .with_min_temperature(1.0)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
            .with_phase_length(200)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(SaRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

fn bench_aco(c: &mut Criterion) {
    let mut group = c.benchmark_group("aco");
    group.sample_size(10);
    for &n in &[30, 60] {
        let problem = instance(n);
        let config = AcoConfig::default().with_cycles(20).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(problem, config), |b, (p, c)| {
            b.iter(|| black_box(AcoRunner::run(black_box(p), black_box(c))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_steepest_scan,
    bench_nn_multi_start,
    bench_hc_two_opt,
    bench_sa,
    bench_aco
);
criterion_main!(benches);
