//! Python Error Handling for dronesig
//!
//! ## Error Mapping Strategy
//!
//! ```text
//! InvalidScenarioParameters              → InvalidScenarioError
//! ExternalSignatureComputationFailure    → SignatureComputationError
//! SignatureTooLarge (sigkeys/stream2sig) → ValueError
//! other SignatureError (stream2sig)      → SignatureComputationError
//! every other estimator / cache error    → DroneSigError
//! ```
//!
//! Both specific exceptions derive from `DroneSigError`, so Python code can
//! catch everything raised by the extension with a single except clause.

use dronesig_cache::CacheError;
use dronesig_core::{EstimatorError, SignatureError};
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyValueError};
use pyo3::prelude::*;
use thiserror::Error;

create_exception!(
    dronesig,
    DroneSigError,
    PyException,
    "Base exception for every dronesig failure"
);
create_exception!(
    dronesig,
    InvalidScenarioError,
    DroneSigError,
    "Scenario parameters outside their physical domain"
);
create_exception!(
    dronesig,
    SignatureComputationError,
    DroneSigError,
    "The path-signature primitive rejected a stream"
);

/// Failures raised by binding functions before they reach Python
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Estimator(#[from] EstimatorError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Invalid argument '{parameter}': {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: String,
    },
}

impl From<BindingError> for PyErr {
    fn from(error: BindingError) -> Self {
        match error {
            BindingError::Estimator(error) => ErrorConverter::estimator_error_to_py(error),
            BindingError::Signature(error @ SignatureError::SignatureTooLarge { .. }) => {
                PyValueError::new_err(error.to_string())
            }
            BindingError::Signature(error) => {
                SignatureComputationError::new_err(error.to_string())
            }
            BindingError::Cache(CacheError::Estimator(error)) => {
                ErrorConverter::estimator_error_to_py(error)
            }
            BindingError::Cache(error) => DroneSigError::new_err(error.to_string()),
            error @ BindingError::InvalidArgument { .. } => {
                PyValueError::new_err(error.to_string())
            }
        }
    }
}

/// Error conversion utilities
pub struct ErrorConverter;

impl ErrorConverter {
    /// Map an estimator error onto the exception hierarchy
    pub fn estimator_error_to_py(error: EstimatorError) -> PyErr {
        let message = error.to_string();
        match error {
            EstimatorError::InvalidScenarioParameters { .. } => {
                InvalidScenarioError::new_err(message)
            }
            EstimatorError::ExternalSignatureComputationFailure(_) => {
                SignatureComputationError::new_err(message)
            }
            _ => DroneSigError::new_err(message),
        }
    }

    /// Register the exception types on `module`
    pub fn register(py: Python<'_>, module: &PyModule) -> PyResult<()> {
        module.add("DroneSigError", py.get_type::<DroneSigError>())?;
        module.add("InvalidScenarioError", py.get_type::<InvalidScenarioError>())?;
        module.add("SignatureComputationError", py.get_type::<SignatureComputationError>())?;
        Ok(())
    }
}

/// Result type alias for binding functions
pub type BindingResult<T> = Result<T, BindingError>;
