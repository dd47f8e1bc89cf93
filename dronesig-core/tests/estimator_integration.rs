//! End-to-end expected signature estimation

mod common;

use common::*;
use dronesig_core::{
    signature_dimension, EstimatorConfig, EstimatorError, ExecutionMode, NonDroneScenario,
    PhysicalConstants, ScenarioRequest, SignatureEstimator,
};

#[test]
fn seeded_nondrone_is_reproducible() {
    let config = EstimatorConfig::default()
        .with_incident_signals(10)
        .with_truncation_level(2)
        .with_lead_lag(false);
    let estimator = SignatureEstimator::new(config).unwrap();
    let scenario = NonDroneScenario::new(0.0, 100.0);

    let first = estimator.compute_expected_signature_for_nondrone(&scenario, Some(42)).unwrap();
    let second = estimator.compute_expected_signature_for_nondrone(&scenario, Some(42)).unwrap();

    // A fresh estimator stands in for a process restart
    let restarted = SignatureEstimator::new(config).unwrap();
    let third = restarted.compute_expected_signature_for_nondrone(&scenario, Some(42)).unwrap();

    assert_eq!(first.len(), signature_dimension(2, 2));
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn seeded_drone_is_reproducible() {
    let estimator = fast_estimator(8);
    let drone = approaching_drone();

    let a = estimator.compute_expected_signature_for_drone(&drone, Some(1234)).unwrap();
    let b = estimator.compute_expected_signature_for_drone(&drone, Some(1234)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_move_drone_signature() {
    let estimator = fast_estimator(6);
    let drone = hovering_quadcopter();

    let a = estimator.compute_expected_signature_for_drone(&drone, Some(1)).unwrap();
    let b = estimator.compute_expected_signature_for_drone(&drone, Some(2)).unwrap();
    assert!(max_abs_difference(&a, &b) > 0.0);
}

#[test]
fn unseeded_requests_still_produce_full_signatures() {
    let estimator = fast_estimator(4);
    let expected = estimator
        .compute_expected_signature_for_drone(&hovering_quadcopter(), None)
        .unwrap();
    assert_eq!(expected.len(), estimator.signature_length());
    assert!(expected.values.iter().all(|v| v.is_finite()));
}

#[test]
fn unseeded_calls_draw_fresh_batches_of_fixed_length() {
    let estimator = fast_estimator(6);
    let drone = hovering_quadcopter();

    let first = estimator.compute_reflected_signals_for_drone(&drone, None).unwrap();
    let second = estimator.compute_reflected_signals_for_drone(&drone, None).unwrap();
    assert_eq!(first.len(), second.len());
    assert_ne!(first, second);

    let a = estimator.compute_expected_signature_for_drone(&drone, None).unwrap();
    let b = estimator.compute_expected_signature_for_drone(&drone, None).unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), estimator.signature_length());
}

#[test]
fn oversized_truncation_level_is_a_configuration_error() {
    let result = SignatureEstimator::new(EstimatorConfig::quick().with_truncation_level(64));
    assert!(matches!(result, Err(EstimatorError::InvalidConfiguration { .. })));
}

#[test]
fn noiseless_nondrone_ignores_seed() {
    // Every non-drone reflection is the deterministic body echo
    let estimator = fast_estimator(3);
    let bird = gliding_bird();

    let a = estimator.compute_expected_signature_for_nondrone(&bird, Some(5)).unwrap();
    let b = estimator.compute_expected_signature_for_nondrone(&bird, Some(6)).unwrap();
    assert_close(&a.values, &b.values, 1e-12);
}

#[test]
fn noisy_batches_follow_the_seed() {
    let config = fast_config(5).with_signal_to_noise_ratio(5.0);
    let estimator = SignatureEstimator::new(config).unwrap();
    let bird = gliding_bird();

    let a = estimator.compute_reflected_signals_for_nondrone(&bird, Some(77)).unwrap();
    let b = estimator.compute_reflected_signals_for_nondrone(&bird, Some(77)).unwrap();
    let c = estimator.compute_reflected_signals_for_nondrone(&bird, Some(78)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    // Noise makes otherwise identical body echoes differ
    assert_ne!(a[0].amplitudes(), a[1].amplitudes());
}

#[test]
fn zero_db_snr_adds_noise() {
    let noiseless = fast_estimator(2);
    let noisy = SignatureEstimator::new(fast_config(2).with_signal_to_noise_ratio(0.0)).unwrap();
    let bird = gliding_bird();

    let clean = noiseless.compute_reflected_signals_for_nondrone(&bird, Some(3)).unwrap();
    let dirty = noisy.compute_reflected_signals_for_nondrone(&bird, Some(3)).unwrap();
    assert_ne!(clean[0].amplitudes(), dirty[0].amplitudes());
}

#[test]
fn reflection_batches_have_requested_shape() {
    let estimator = fast_estimator(7);
    let batch = estimator
        .compute_reflected_signals_for_drone(&approaching_drone(), Some(10))
        .unwrap();

    assert_eq!(batch.len(), 7);
    for waveform in &batch {
        assert_eq!(waveform.len(), 400);
        assert!(waveform.amplitudes().iter().all(|a| a.is_finite()));
    }
}

#[test]
fn signature_length_depends_only_on_configuration() {
    for (lead_lag, level) in [(true, 1), (true, 3), (false, 2), (false, 4)] {
        let config = fast_config(2).with_lead_lag(lead_lag).with_truncation_level(level);
        let estimator = SignatureEstimator::new(config).unwrap();
        let width = if lead_lag { 3 } else { 2 };

        let drone = estimator
            .compute_expected_signature_for_drone(&hovering_quadcopter(), Some(0))
            .unwrap();
        let other = estimator
            .compute_expected_signature_for_nondrone(&gliding_bird(), Some(0))
            .unwrap();

        assert_eq!(estimator.signature_length(), signature_dimension(width, level));
        assert_eq!(drone.len(), estimator.signature_length());
        assert_eq!(other.len(), estimator.signature_length());
    }
}

#[test]
fn generic_request_matches_typed_entry_points() {
    let estimator = fast_estimator(4);
    let drone = hovering_quadcopter();

    let typed = estimator.compute_expected_signature_for_drone(&drone, Some(9)).unwrap();
    let generic = estimator
        .compute_expected_signature(&ScenarioRequest::new(drone, Some(9)))
        .unwrap();
    assert_eq!(typed, generic);
}

#[test]
fn invalid_inputs_are_reported() {
    let estimator = fast_estimator(2);

    let negative_diameter = dronesig_core::DroneScenario::new(6000.0, 0.0, -0.3, 100.0, 0.5);
    assert!(matches!(
        estimator.compute_expected_signature_for_drone(&negative_diameter, Some(1)),
        Err(EstimatorError::InvalidScenarioParameters { .. })
    ));

    let faster_than_light = NonDroneScenario::new(4.0e8, 10.0);
    assert!(matches!(
        estimator.compute_expected_signature_for_nondrone(&faster_than_light, Some(1)),
        Err(EstimatorError::InvalidScenarioParameters { .. })
    ));

    let bad_constants = PhysicalConstants::default().with_sampling(1, 4);
    assert!(matches!(
        SignatureEstimator::new(fast_config(2).with_constants(bad_constants)),
        Err(EstimatorError::InvalidConfiguration { .. })
    ));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_execution_matches_sequential() {
    let sequential =
        SignatureEstimator::new(fast_config(16).with_signal_to_noise_ratio(8.0)).unwrap();
    let parallel = SignatureEstimator::new(
        fast_config(16)
            .with_signal_to_noise_ratio(8.0)
            .with_execution(ExecutionMode::Parallel),
    )
    .unwrap();
    let drone = approaching_drone();

    assert_eq!(
        sequential.compute_expected_signature_for_drone(&drone, Some(31)).unwrap(),
        parallel.compute_expected_signature_for_drone(&drone, Some(31)).unwrap()
    );
    assert_eq!(
        sequential.compute_reflected_signals_for_drone(&drone, Some(31)).unwrap(),
        parallel.compute_reflected_signals_for_drone(&drone, Some(31)).unwrap()
    );
}

#[cfg(not(feature = "parallel"))]
#[test]
fn parallel_execution_requires_feature() {
    let result = SignatureEstimator::new(fast_config(2).with_execution(ExecutionMode::Parallel));
    assert!(matches!(result, Err(EstimatorError::InvalidConfiguration { .. })));
}

#[test]
fn configuration_round_trips_through_json() {
    let config = fast_config(3).with_signal_to_noise_ratio(12.5);
    let json = serde_json::to_string(&config).unwrap();
    let back: EstimatorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.n_incident_signals, 3);
    assert_eq!(back.truncation_level, 2);
    assert_eq!(back.signal_to_noise_ratio_db, Some(12.5));
    assert_eq!(back.execution, ExecutionMode::Sequential);
    assert_eq!(back.constants.samples_per_waveform(), 400);
}
