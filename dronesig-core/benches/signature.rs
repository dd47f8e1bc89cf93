//! Signature and estimator benchmarks
//!
//! Run with: cargo bench -p dronesig-core --bench signature
//! Parallel comparison: cargo bench -p dronesig-core --features parallel --bench signature

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use dronesig_core::{
    DroneScenario, EstimatorConfig, ExecutionMode, PathStream, PhysicalConstants,
    SignatureBackend, SignatureEstimator, StreamTransform, TensorSignature,
};

fn sine_stream(samples: usize) -> PathStream {
    let x: Vec<f64> = (0..samples).map(|i| (i as f64 * 0.01).sin()).collect();
    let y: Vec<f64> = (0..samples).map(|i| (i as f64 * 0.013).cos()).collect();
    StreamTransform::PartialLeadLag
        .apply(&x, &y)
        .expect("equal-length channels")
}

/// Signature of one lead-lag stream at increasing truncation levels
fn bench_signature_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_levels");
    let stream = sine_stream(10_000);
    group.throughput(Throughput::Elements(stream.len() as u64));

    for level in [1usize, 2, 3, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| TensorSignature.compute_signature(black_box(&stream), level))
        });
    }
    group.finish();
}

/// Whole expected-signature call, sequential vs parallel
fn bench_expected_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("expected_signature");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    let drone = DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.5);
    let base = EstimatorConfig::default()
        .with_constants(PhysicalConstants::default().with_sampling(5_000, 50));

    let mut modes = vec![ExecutionMode::Sequential];
    if cfg!(feature = "parallel") {
        modes.push(ExecutionMode::Parallel);
    }

    for n in [16usize, 64] {
        group.throughput(Throughput::Elements(n as u64));
        for &mode in &modes {
            let config = base.with_incident_signals(n).with_execution(mode);
            let estimator = SignatureEstimator::new(config).expect("valid configuration");
            group.bench_with_input(BenchmarkId::new(format!("{:?}", mode), n), &n, |b, _| {
                b.iter(|| {
                    estimator.compute_expected_signature_for_drone(black_box(&drone), Some(7))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_signature_levels, bench_expected_signature);
criterion_main!(benches);
