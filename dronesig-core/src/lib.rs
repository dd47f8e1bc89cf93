//! Core simulation engine for dronesig
//!
//! Estimates the expected path signature of radar returns reflected off
//! rotorcraft (a body plus a spinning propeller) and non-rotorcraft objects.
//! One expected signature is a fixed-length feature vector per physical
//! scenario, ready for a downstream classifier.
//!
//! Pipeline per scenario:
//! 1. Validate the scenario and resolve its seed
//! 2. Lazily simulate `n_incident_signals` Doppler-shifted reflections
//! 3. Pair each reflection with the shared incident waveform, optionally
//!    apply the partial lead-lag transform
//! 4. Compute the truncated path signature of every stream
//! 5. Average the signatures elementwise
//!
//! ```no_run
//! use dronesig_core::{DroneScenario, EstimatorConfig, SignatureEstimator};
//!
//! let estimator = SignatureEstimator::new(EstimatorConfig::default())?;
//! let drone = DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.5);
//!
//! let expected = estimator.compute_expected_signature_for_drone(&drone, Some(7))?;
//! assert_eq!(expected.len(), estimator.signature_length());
//! # Ok::<(), dronesig_core::EstimatorError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod constants;
pub mod errors;
pub mod estimator;
pub mod leadlag;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reflection;
pub mod scenario;
pub mod signal;
pub mod signature;
pub mod traits;

// Public API
pub use constants::PhysicalConstants;
pub use errors::{EstimatorError, EstimatorResult, SignatureError};
pub use estimator::{
    estimate_expected_signature, EstimatorConfig, ExecutionMode, ExpectedSignature,
    SignatureAccumulator, SignatureEstimator,
};
pub use leadlag::{PathStream, StreamTransform};
pub use reflection::{AngleTolerance, NoiseModel, ReflectionSimulator, ReflectionStream};
pub use scenario::{DroneScenario, NonDroneScenario, ScenarioParameters, ScenarioRequest};
pub use signal::{IncidentSignalGenerator, Waveform};
pub use signature::{
    checked_signature_dimension, signature_dimension, signature_keys, try_signature_dimension,
    try_signature_keys, SignatureVector, TensorSignature,
};
pub use traits::SignatureBackend;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
