//! `ExpectedSignatureCalculator` Python class

use std::path::PathBuf;

use dronesig_cache::{CachedEstimator, FileCache};
use dronesig_core::{
    DroneScenario, EstimatorConfig, ExecutionMode, ExpectedSignature, NonDroneScenario,
    ScenarioRequest, SignatureEstimator, Waveform,
};
use pyo3::prelude::*;

use crate::errors::{BindingError, BindingResult};

/// `(times, amplitudes)` as handed to Python
type WaveformTuple = (Vec<f64>, Vec<f64>);

fn waveform_to_tuple(waveform: Waveform) -> WaveformTuple {
    waveform.into_parts()
}

enum Backend {
    Direct(SignatureEstimator),
    Cached(CachedEstimator<FileCache>),
}

impl Backend {
    fn estimator(&self) -> &SignatureEstimator {
        match self {
            Self::Direct(estimator) => estimator,
            Self::Cached(cached) => cached.estimator(),
        }
    }

    fn expected_signature(&self, request: &ScenarioRequest) -> BindingResult<ExpectedSignature> {
        Ok(match self {
            Self::Direct(estimator) => estimator.compute_expected_signature(request)?,
            Self::Cached(cached) => cached.compute_expected_signature(request)?,
        })
    }
}

/// Expected path-signature estimator for drone and non-drone scenarios
///
/// Parameters mirror the estimator configuration; everything else uses the
/// default physical constants (C = 299 792 458 m/s, F = 1 GHz, A = 1).
/// Passing `cache_directory` stores seeded results on disk and serves
/// repeated requests from there.
#[pyclass(module = "dronesig", frozen)]
pub struct ExpectedSignatureCalculator {
    backend: Backend,
    cache_directory: Option<PathBuf>,
}

#[pymethods]
impl ExpectedSignatureCalculator {
    #[new]
    #[pyo3(signature = (
        n_incident_signals = 3000,
        truncation_level = 3,
        use_lead_lag_transformation = true,
        signal_to_noise_ratio = None,
        cache_directory = None,
        parallel = false
    ))]
    fn new(
        n_incident_signals: usize,
        truncation_level: usize,
        use_lead_lag_transformation: bool,
        signal_to_noise_ratio: Option<f64>,
        cache_directory: Option<PathBuf>,
        parallel: bool,
    ) -> PyResult<Self> {
        let mut config = EstimatorConfig::default()
            .with_incident_signals(n_incident_signals)
            .with_truncation_level(truncation_level)
            .with_lead_lag(use_lead_lag_transformation)
            .with_execution(if parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            });
        if let Some(snr) = signal_to_noise_ratio {
            config = config.with_signal_to_noise_ratio(snr);
        }

        let estimator = SignatureEstimator::new(config).map_err(BindingError::from)?;
        let backend = match &cache_directory {
            Some(directory) => {
                let cache = FileCache::open(directory).map_err(BindingError::from)?;
                Backend::Cached(CachedEstimator::from_estimator(estimator, cache))
            }
            None => Backend::Direct(estimator),
        };

        Ok(Self {
            backend,
            cache_directory,
        })
    }

    #[getter]
    fn n_incident_signals(&self) -> usize {
        self.config().n_incident_signals
    }

    #[getter]
    fn truncation_level(&self) -> usize {
        self.config().truncation_level
    }

    #[getter]
    fn use_lead_lag_transformation(&self) -> bool {
        self.config().use_lead_lag_transformation
    }

    #[getter]
    fn signal_to_noise_ratio(&self) -> Option<f64> {
        self.config().signal_to_noise_ratio_db
    }

    #[getter]
    fn cache_directory(&self) -> Option<PathBuf> {
        self.cache_directory.clone()
    }

    /// Number of coefficients in every expected signature
    fn signature_length(&self) -> usize {
        self.backend.estimator().signature_length()
    }

    /// Shared incident waveform as `(times, amplitudes)`
    fn incident_signal(&self) -> WaveformTuple {
        waveform_to_tuple(self.backend.estimator().incident_signal().clone())
    }

    /// Expected signature of a drone
    ///
    /// `d` is the blade diameter (m), `z` the distance (m) and `proportion`
    /// the share of reflections off the body.
    #[pyo3(signature = (rpm, speed, d, z, proportion, random_state = None))]
    fn compute_expected_signature_for_drone(
        &self,
        py: Python<'_>,
        rpm: f64,
        speed: f64,
        d: f64,
        z: f64,
        proportion: f64,
        random_state: Option<u64>,
    ) -> PyResult<Vec<f64>> {
        let drone = DroneScenario::new(rpm, speed, d, z, proportion);
        self.expected_signature(py, ScenarioRequest::drone(drone, random_state))
    }

    /// Expected signature of a non-drone object
    #[pyo3(signature = (speed, z, random_state = None))]
    fn compute_expected_signature_for_nondrone(
        &self,
        py: Python<'_>,
        speed: f64,
        z: f64,
        random_state: Option<u64>,
    ) -> PyResult<Vec<f64>> {
        let request = ScenarioRequest::non_drone(NonDroneScenario::new(speed, z), random_state);
        self.expected_signature(py, request)
    }

    /// Raw reflections off a drone as a list of `(times, amplitudes)`
    #[pyo3(signature = (rpm, speed, d, z, proportion, random_state = None))]
    fn compute_reflected_signals_for_drone(
        &self,
        py: Python<'_>,
        rpm: f64,
        speed: f64,
        d: f64,
        z: f64,
        proportion: f64,
        random_state: Option<u64>,
    ) -> PyResult<Vec<WaveformTuple>> {
        let drone = DroneScenario::new(rpm, speed, d, z, proportion);
        self.reflected_signals(py, ScenarioRequest::drone(drone, random_state))
    }

    /// Raw reflections off a non-drone object as a list of `(times, amplitudes)`
    #[pyo3(signature = (speed, z, random_state = None))]
    fn compute_reflected_signals_for_nondrone(
        &self,
        py: Python<'_>,
        speed: f64,
        z: f64,
        random_state: Option<u64>,
    ) -> PyResult<Vec<WaveformTuple>> {
        let request = ScenarioRequest::non_drone(NonDroneScenario::new(speed, z), random_state);
        self.reflected_signals(py, request)
    }

    fn __repr__(&self) -> String {
        let config = self.config();
        format!(
            "ExpectedSignatureCalculator(n_incident_signals={}, truncation_level={}, \
             use_lead_lag_transformation={}, signal_to_noise_ratio={:?}, cache_directory={:?})",
            config.n_incident_signals,
            config.truncation_level,
            config.use_lead_lag_transformation,
            config.signal_to_noise_ratio_db,
            self.cache_directory
        )
    }
}

impl ExpectedSignatureCalculator {
    fn config(&self) -> &EstimatorConfig {
        self.backend.estimator().config()
    }

    fn expected_signature(&self, py: Python<'_>, request: ScenarioRequest) -> PyResult<Vec<f64>> {
        let expected = py.allow_threads(|| self.backend.expected_signature(&request))?;
        Ok(expected.values)
    }

    fn reflected_signals(
        &self,
        py: Python<'_>,
        request: ScenarioRequest,
    ) -> PyResult<Vec<WaveformTuple>> {
        let estimator = self.backend.estimator();
        let batch = py
            .allow_threads(|| estimator.compute_reflected_signals(&request))
            .map_err(BindingError::from)?;
        Ok(batch.into_iter().map(waveform_to_tuple).collect())
    }
}
