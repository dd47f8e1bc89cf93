//! Cached estimation against a file-backed store

use dronesig_cache::{CacheKey, CachedEstimator, FileCache, ResultCache};
use dronesig_core::{
    DroneScenario, EstimatorConfig, PhysicalConstants, ScenarioRequest, SignatureEstimator,
};
use tempfile::TempDir;

fn config() -> EstimatorConfig {
    EstimatorConfig::default()
        .with_incident_signals(4)
        .with_truncation_level(2)
        .with_constants(PhysicalConstants::default().with_sampling(300, 3))
}

fn drone() -> DroneScenario {
    DroneScenario::new(7000.0, 8.0, 0.3, 120.0, 0.5)
}

#[test]
fn test_results_persist_across_estimators() {
    let dir = TempDir::new().unwrap();

    let first = CachedEstimator::new(config(), FileCache::open(dir.path()).unwrap()).unwrap();
    let computed = first.compute_expected_signature_for_drone(&drone(), Some(21)).unwrap();
    assert_eq!(first.stats().stores, 1);

    // A new estimator over the same directory stands in for a new process
    let second = CachedEstimator::new(config(), FileCache::open(dir.path()).unwrap()).unwrap();
    let served = second.compute_expected_signature_for_drone(&drone(), Some(21)).unwrap();

    assert_eq!(served, computed);
    assert_eq!(second.stats().hits, 1);
    assert_eq!(second.stats().misses, 0);
}

#[test]
fn test_cached_result_matches_direct_computation() {
    let dir = TempDir::new().unwrap();
    let cached = CachedEstimator::new(config(), FileCache::open(dir.path()).unwrap()).unwrap();
    let direct = SignatureEstimator::new(config()).unwrap();

    let via_cache = cached.compute_expected_signature_for_drone(&drone(), Some(5)).unwrap();
    let computed = direct.compute_expected_signature_for_drone(&drone(), Some(5)).unwrap();
    assert_eq!(via_cache, computed);
}

#[test]
fn test_configuration_change_misses() {
    let dir = TempDir::new().unwrap();
    let coarse = CachedEstimator::new(config(), FileCache::open(dir.path()).unwrap()).unwrap();
    let deeper = CachedEstimator::new(
        config().with_truncation_level(3),
        FileCache::open(dir.path()).unwrap(),
    )
    .unwrap();

    coarse.compute_expected_signature_for_drone(&drone(), Some(1)).unwrap();
    let value = deeper.compute_expected_signature_for_drone(&drone(), Some(1)).unwrap();

    assert_eq!(deeper.stats().misses, 1);
    assert_eq!(value.len(), deeper.estimator().signature_length());
}

#[test]
fn test_corrupt_file_is_recomputed() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::open(dir.path()).unwrap();
    let key = CacheKey::for_request(&config(), &ScenarioRequest::drone(drone(), Some(9))).unwrap();
    std::fs::write(cache.entry_path(&key), "[1, 2,").unwrap();

    let estimator = CachedEstimator::new(config(), cache).unwrap();
    let value = estimator.compute_expected_signature_for_drone(&drone(), Some(9)).unwrap();

    assert_eq!(estimator.stats().misses, 1);
    assert_eq!(estimator.cache().lookup(&key), Some(value));
}
