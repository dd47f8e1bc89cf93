//! Result caching for expected signatures
//!
//! ## Overview
//!
//! Expected signatures are expensive: thousands of reflections, each with a
//! full path signature. A seeded request is a pure function of the estimator
//! configuration, the scenario and the seed, so its result can be stored and
//! served again without recomputation.
//!
//! ## Keys
//!
//! A [`CacheKey`] is the SHA-256 of the canonical JSON document
//! `{"arguments": .., "config": .., "operation": ..}` with object keys sorted.
//! The execution mode is normalized before hashing since sequential and
//! parallel runs produce identical results.
//!
//! ## Stores
//!
//! | Store          | Lifetime       | Shared between processes |
//! |----------------|----------------|--------------------------|
//! | [`MemoryCache`] | process        | no                       |
//! | [`FileCache`]   | on disk        | yes (one file per key)   |
//!
//! Stores are best effort. A corrupt or unreadable entry is a miss, and a
//! failed write still returns the computed result.
//!
//! ## Seeds
//!
//! Unseeded requests are computed and never stored: serving a cached draw
//! would masquerade as a fresh stochastic one.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dronesig_cache::{CachedEstimator, FileCache};
//! use dronesig_core::{DroneScenario, EstimatorConfig};
//!
//! let cache = FileCache::open("signature-cache")?;
//! let estimator = CachedEstimator::new(EstimatorConfig::default(), cache)?;
//!
//! let drone = DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.5);
//! let first = estimator.compute_expected_signature_for_drone(&drone, Some(7))?;
//! let again = estimator.compute_expected_signature_for_drone(&drone, Some(7))?;
//! assert_eq!(first, again);
//! assert_eq!(estimator.stats().hits, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cached;
pub mod file;
pub mod key;
pub mod memory;

pub use cached::{CacheStats, CachedEstimator};
pub use file::FileCache;
pub use key::{CacheKey, CacheOperation};
pub use memory::MemoryCache;

use dronesig_core::{EstimatorError, ExpectedSignature};
use thiserror::Error;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,

    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),
}

/// Storage backend for expected signatures
///
/// Implementations must be safe to share between threads; a lookup never
/// fails, it only misses.
pub trait ResultCache: Send + Sync {
    /// Stored result for `key`, if any
    fn lookup(&self, key: &CacheKey) -> Option<ExpectedSignature>;

    /// Store `value` under `key`, replacing any previous entry
    fn store(&self, key: &CacheKey, value: &ExpectedSignature) -> Result<(), CacheError>;
}

impl<C: ResultCache + ?Sized> ResultCache for &C {
    fn lookup(&self, key: &CacheKey) -> Option<ExpectedSignature> {
        (**self).lookup(key)
    }

    fn store(&self, key: &CacheKey, value: &ExpectedSignature) -> Result<(), CacheError> {
        (**self).store(key, value)
    }
}
