//! Estimator composed with a result cache

use std::sync::atomic::{AtomicU64, Ordering};

use dronesig_core::{
    DroneScenario, EstimatorConfig, ExpectedSignature, NonDroneScenario, ScenarioRequest,
    SignatureBackend, SignatureEstimator, TensorSignature,
};

use crate::{CacheError, CacheKey, ResultCache};

/// Cache activity counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Results served from the cache
    pub hits: u64,
    /// Seeded requests that had to be computed
    pub misses: u64,
    /// Results written to the cache
    pub stores: u64,
    /// Writes that failed (result still returned)
    pub store_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    store_failures: AtomicU64,
}

/// [`SignatureEstimator`] that consults a [`ResultCache`] for seeded requests
#[derive(Debug)]
pub struct CachedEstimator<C: ResultCache, B: SignatureBackend = TensorSignature> {
    estimator: SignatureEstimator<B>,
    cache: C,
    counters: Counters,
}

impl<C: ResultCache> CachedEstimator<C, TensorSignature> {
    /// Cached estimator using the built-in signature backend
    pub fn new(config: EstimatorConfig, cache: C) -> Result<Self, CacheError> {
        Ok(Self::from_estimator(SignatureEstimator::new(config)?, cache))
    }
}

impl<C: ResultCache, B: SignatureBackend> CachedEstimator<C, B> {
    /// Wrap an existing estimator
    pub fn from_estimator(estimator: SignatureEstimator<B>, cache: C) -> Self {
        Self {
            estimator,
            cache,
            counters: Counters::default(),
        }
    }

    /// Underlying estimator
    pub fn estimator(&self) -> &SignatureEstimator<B> {
        &self.estimator
    }

    /// Underlying cache
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            store_failures: self.counters.store_failures.load(Ordering::Relaxed),
        }
    }

    /// Expected signature of any scenario, served from the cache when seeded
    pub fn compute_expected_signature(
        &self,
        request: &ScenarioRequest,
    ) -> Result<ExpectedSignature, CacheError> {
        if request.seed.is_none() {
            return Ok(self.estimator.compute_expected_signature(request)?);
        }

        let key = CacheKey::for_request(self.estimator.config(), request)?;
        if let Some(hit) = self.cache.lookup(&key) {
            if hit.len() == self.estimator.signature_length() {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("Cache hit {}", key);
                return Ok(hit);
            }
            log::warn!("Cache entry {} has {} coefficients, recomputing", key, hit.len());
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let value = self.estimator.compute_expected_signature(request)?;

        match self.cache.store(&key, &value) {
            Ok(()) => {
                self.counters.stores.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                self.counters.store_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to store cache entry {}: {}", key, error);
            }
        }
        Ok(value)
    }

    /// Expected signature of a drone scenario
    pub fn compute_expected_signature_for_drone(
        &self,
        scenario: &DroneScenario,
        seed: Option<u64>,
    ) -> Result<ExpectedSignature, CacheError> {
        self.compute_expected_signature(&ScenarioRequest::drone(*scenario, seed))
    }

    /// Expected signature of a non-drone scenario
    pub fn compute_expected_signature_for_nondrone(
        &self,
        scenario: &NonDroneScenario,
        seed: Option<u64>,
    ) -> Result<ExpectedSignature, CacheError> {
        self.compute_expected_signature(&ScenarioRequest::non_drone(*scenario, seed))
    }
}
