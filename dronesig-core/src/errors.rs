//! Error Types for Simulation and Signature Estimation
//!
//! Two families of failure exist and neither is retried: the simulation is
//! deterministic given its seed, so a failing call fails identically again.
//!
//! ### Contract violations
//! - `InvalidScenarioParameters`: out-of-domain kinematics (negative blade
//!   diameter, hit proportion outside `[0, 1]`, non-finite values)
//! - `InvalidConfiguration`: estimator settings that cannot produce a
//!   signature (zero reflections, truncation level 0, bad constants)
//! - `MismatchedWaveforms`: incident and reflected waveforms of different length
//!
//! ### Signature primitive failures
//! - `ExternalSignatureComputationFailure`: the path-signature primitive
//!   rejected the stream, wrapping the [`SignatureError`] it reported
//!
//! ```rust
//! use dronesig_core::{DroneScenario, EstimatorError, SignatureEstimator, EstimatorConfig};
//!
//! let estimator = SignatureEstimator::new(EstimatorConfig::quick()).unwrap();
//! let broken = DroneScenario::new(6000.0, 0.0, 0.3, 100.0, 1.5);
//!
//! match estimator.compute_expected_signature_for_drone(&broken, Some(1)) {
//!     Err(EstimatorError::InvalidScenarioParameters { reason }) => {
//!         // Caller bug: fix the scenario, do not retry
//!         assert!(reason.contains("proportion"));
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! All variants are `Copy` and carry only `&'static str` messages so they can
//! be returned from the `no_std` core without allocation.

use thiserror_no_std::Error;

/// Result type for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Errors raised while simulating reflections or estimating signatures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EstimatorError {
    /// Scenario kinematics outside their physical domain
    #[error("Invalid scenario parameters: {reason}")]
    InvalidScenarioParameters {
        /// Which constraint was violated
        reason: &'static str,
    },

    /// Estimator configuration cannot produce a signature
    #[error("Invalid estimator configuration: {reason}")]
    InvalidConfiguration {
        /// Which setting was rejected
        reason: &'static str,
    },

    /// Incident and reflected waveforms must be sampled on grids of equal length
    #[error("Waveform length mismatch: incident has {incident} samples, reflected has {reflected}")]
    MismatchedWaveforms {
        /// Samples in the incident waveform
        incident: usize,
        /// Samples in the reflected waveform
        reflected: usize,
    },

    /// A signature of unexpected length was folded into a running mean
    #[error("Signature length mismatch: expected {expected}, found {found}")]
    SignatureLengthMismatch {
        /// Length fixed by the first signature of the batch
        expected: usize,
        /// Length of the offending signature
        found: usize,
    },

    /// The path-signature primitive rejected the stream
    #[error("Signature computation failed: {0}")]
    ExternalSignatureComputationFailure(SignatureError),

    /// Mean of zero signatures requested
    #[error("Cannot average an empty batch of signatures")]
    EmptyBatch,
}

impl From<SignatureError> for EstimatorError {
    fn from(error: SignatureError) -> Self {
        Self::ExternalSignatureComputationFailure(error)
    }
}

/// Errors reported by a path-signature backend
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SignatureError {
    /// A path needs at least one increment
    #[error("Stream has {rows} rows, at least 2 are required")]
    TooFewRows {
        /// Rows in the rejected stream
        rows: usize,
    },

    /// Streams need at least one channel
    #[error("Stream width must be positive")]
    ZeroWidth,

    /// Level 0 carries no information
    #[error("Truncation level must be positive")]
    ZeroTruncationLevel,

    /// Rows of differing width
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedStream {
        /// Index of the offending row
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },

    /// Coefficient count overflows or exceeds `MAX_SIGNATURE_COEFFICIENTS`
    #[error("Signature of width {width} at level {truncation_level} is too large")]
    SignatureTooLarge {
        /// Channels of the stream
        width: usize,
        /// Requested truncation level
        truncation_level: usize,
    },

    /// NaN or infinity inside the stream
    #[error("Non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Row of the value
        row: usize,
        /// Column of the value
        column: usize,
    },
}
