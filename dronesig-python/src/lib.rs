//! dronesig Python Bindings
//!
//! Exposes the expected path-signature estimator and the path-signature
//! primitive to notebook orchestration.
//!
//! ## Usage
//!
//! ```python
//! import dronesig
//!
//! calc = dronesig.ExpectedSignatureCalculator(n_incident_signals=500, truncation_level=2)
//! drone = calc.compute_expected_signature_for_drone(6000, 10, 0.3, 100, 0.5, random_state=7)
//! bird = calc.compute_expected_signature_for_nondrone(10, 100, random_state=7)
//! assert len(drone) == len(bird) == calc.signature_length()
//!
//! print(dronesig.sigkeys(3, 2))
//! ```
//!
//! Long computations release the GIL.

use dronesig_core::constants::{self, physics};
use pyo3::prelude::*;

mod calculator;
mod errors;
mod signature;

use calculator::ExpectedSignatureCalculator;
use errors::ErrorConverter;
use signature::{sigdim, sigkeys, stream2sig};

/// dronesig Python module
#[pymodule]
fn dronesig(py: Python, m: &PyModule) -> PyResult<()> {
    // Version information
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("__doc__", "Expected path signatures of radar reflections off drones and other objects")?;

    // Exception classes
    ErrorConverter::register(py, m)?;

    // Estimator
    m.add_class::<ExpectedSignatureCalculator>()?;

    // Signature primitive
    m.add_function(wrap_pyfunction!(stream2sig, m)?)?;
    m.add_function(wrap_pyfunction!(sigdim, m)?)?;
    m.add_function(wrap_pyfunction!(sigkeys, m)?)?;

    // Physical defaults
    let defaults = PyModule::new(py, "constants")?;
    defaults.add("SPEED_OF_LIGHT_M_PER_S", physics::SPEED_OF_LIGHT_M_PER_S)?;
    defaults.add("DEFAULT_FREQUENCY_HZ", physics::DEFAULT_FREQUENCY_HZ)?;
    defaults.add("DEFAULT_AMPLITUDE", physics::DEFAULT_AMPLITUDE)?;
    defaults.add("DEFAULT_INCIDENT_SIGNALS", constants::DEFAULT_INCIDENT_SIGNALS)?;
    defaults.add("DEFAULT_TRUNCATION_LEVEL", constants::DEFAULT_TRUNCATION_LEVEL)?;
    m.add_submodule(defaults)?;

    Ok(())
}
