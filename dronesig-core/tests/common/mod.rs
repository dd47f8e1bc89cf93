//! Shared fixtures for dronesig-core integration tests
//!
//! Configurations here trade resolution for speed: a few hundred samples
//! per waveform and a handful of reflections are enough to exercise every
//! code path without making the suite slow in debug builds.

#![allow(dead_code)]

use dronesig_core::{
    DroneScenario, EstimatorConfig, ExpectedSignature, NonDroneScenario, PhysicalConstants,
    SignatureEstimator,
};

/// Coarse sampling: 400 samples over 4 wavelengths
pub fn coarse_constants() -> PhysicalConstants {
    PhysicalConstants::default().with_sampling(400, 4)
}

/// Fast configuration with `n` reflections at level 2
pub fn fast_config(n: usize) -> EstimatorConfig {
    EstimatorConfig::default()
        .with_incident_signals(n)
        .with_truncation_level(2)
        .with_constants(coarse_constants())
}

/// Estimator over [`fast_config`]
pub fn fast_estimator(n: usize) -> SignatureEstimator {
    SignatureEstimator::new(fast_config(n)).expect("fast config is valid")
}

/// Small quadcopter hovering 100 m away
pub fn hovering_quadcopter() -> DroneScenario {
    DroneScenario::new(6000.0, 0.0, 0.25, 100.0, 0.3)
}

/// Fast-moving drone approaching the radar
pub fn approaching_drone() -> DroneScenario {
    DroneScenario::new(9000.0, 20.0, 0.4, 250.0, 0.5)
}

/// Bird-like object gliding at 12 m/s
pub fn gliding_bird() -> NonDroneScenario {
    NonDroneScenario::new(12.0, 80.0)
}

/// Largest absolute difference between two expected signatures
pub fn max_abs_difference(a: &ExpectedSignature, b: &ExpectedSignature) -> f64 {
    assert_eq!(a.len(), b.len(), "signatures of different length");
    a.values
        .iter()
        .zip(&b.values)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Assert two slices agree within a relative tolerance
pub fn assert_close(actual: &[f64], expected: &[f64], rel_tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() <= rel_tol * scale,
            "coefficient {} differs: {} vs {}",
            i,
            a,
            e
        );
    }
}
