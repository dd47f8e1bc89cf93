//! Expected signature estimation
//!
//! [`SignatureEstimator`] owns everything fixed for its lifetime: the
//! configuration, the incident waveform and the signature backend. Each call
//! is a pure function of the scenario and seed; reflections and their
//! signatures live only inside that call.
//!
//! The mean is always formed as a sum followed by one division, and the
//! parallel path folds signatures in reflection order, so sequential and
//! parallel runs agree bit for bit.

use alloc::vec::Vec;

use crate::constants::{PhysicalConstants, DEFAULT_INCIDENT_SIGNALS, DEFAULT_TRUNCATION_LEVEL};
use crate::errors::{EstimatorError, EstimatorResult};
use crate::leadlag::StreamTransform;
use crate::reflection::{AngleTolerance, NoiseModel, ReflectionSimulator};
use crate::scenario::{DroneScenario, NonDroneScenario, ScenarioRequest};
use crate::signal::{IncidentSignalGenerator, Waveform};
use crate::signature::{checked_signature_dimension, SignatureVector, TensorSignature};
use crate::traits::SignatureBackend;

/// How reflections of one scenario are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionMode {
    /// One reflection after another on the calling thread
    #[default]
    Sequential,
    /// Reflections spread over the rayon thread pool (feature `parallel`)
    Parallel,
}

/// Estimator settings
///
/// ```rust
/// use dronesig_core::{EstimatorConfig, ExecutionMode};
///
/// let config = EstimatorConfig::default()
///     .with_incident_signals(500)
///     .with_truncation_level(2)
///     .with_lead_lag(false)
///     .with_signal_to_noise_ratio(20.0);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.execution, ExecutionMode::Sequential);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorConfig {
    /// Reflections averaged per scenario
    pub n_incident_signals: usize,
    /// Path-signature truncation level
    pub truncation_level: usize,
    /// Apply the partial lead-lag transform before taking signatures
    pub use_lead_lag_transformation: bool,
    /// Signal-to-noise ratio of the reflections (dB); `None` disables noise
    ///
    /// `Some(0.0)` still adds noise, at equal signal and noise power.
    pub signal_to_noise_ratio_db: Option<f64>,
    /// Closeness test for tangential blade angles
    pub theta_tolerance: AngleTolerance,
    /// Scheduling of reflections
    pub execution: ExecutionMode,
    /// Physical constants and sampling resolution
    pub constants: PhysicalConstants,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            n_incident_signals: DEFAULT_INCIDENT_SIGNALS,
            truncation_level: DEFAULT_TRUNCATION_LEVEL,
            use_lead_lag_transformation: true,
            signal_to_noise_ratio_db: None,
            theta_tolerance: AngleTolerance::default(),
            execution: ExecutionMode::Sequential,
            constants: PhysicalConstants::default(),
        }
    }
}

impl EstimatorConfig {
    /// Small batches on a coarse grid, for exploration and tests
    ///
    /// 20 reflections of 2 000 samples over 20 wavelengths, level 2.
    pub fn quick() -> Self {
        Self {
            n_incident_signals: 20,
            truncation_level: 2,
            constants: PhysicalConstants::default().with_sampling(2_000, 20),
            ..Self::default()
        }
    }

    /// Set the number of reflections per scenario
    pub fn with_incident_signals(mut self, n_incident_signals: usize) -> Self {
        self.n_incident_signals = n_incident_signals;
        self
    }

    /// Set the truncation level
    pub fn with_truncation_level(mut self, truncation_level: usize) -> Self {
        self.truncation_level = truncation_level;
        self
    }

    /// Enable or disable the partial lead-lag transform
    pub fn with_lead_lag(mut self, enabled: bool) -> Self {
        self.use_lead_lag_transformation = enabled;
        self
    }

    /// Add white Gaussian noise at `snr_db`
    pub fn with_signal_to_noise_ratio(mut self, snr_db: f64) -> Self {
        self.signal_to_noise_ratio_db = Some(snr_db);
        self
    }

    /// Remove noise
    pub fn without_noise(mut self) -> Self {
        self.signal_to_noise_ratio_db = None;
        self
    }

    /// Set the tangential-angle tolerance
    pub fn with_theta_tolerance(mut self, tolerance: AngleTolerance) -> Self {
        self.theta_tolerance = tolerance;
        self
    }

    /// Set the execution mode
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Replace the physical constants
    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Stream transform selected by `use_lead_lag_transformation`
    pub fn stream_transform(&self) -> StreamTransform {
        StreamTransform::from_flag(self.use_lead_lag_transformation)
    }

    /// Check the configuration can produce a signature
    pub fn validate(&self) -> EstimatorResult<()> {
        if self.n_incident_signals == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "at least one incident signal is required",
            });
        }
        if self.truncation_level == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "truncation level must be positive",
            });
        }
        if matches!(self.signal_to_noise_ratio_db, Some(snr) if !snr.is_finite()) {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "signal-to-noise ratio must be finite",
            });
        }
        #[cfg(not(feature = "parallel"))]
        if self.execution == ExecutionMode::Parallel {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "parallel execution requires the `parallel` feature",
            });
        }
        let width = self.stream_transform().output_width();
        if checked_signature_dimension(width, self.truncation_level).is_err() {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "truncation level exceeds the signature size limit",
            });
        }
        self.theta_tolerance.validate()?;
        self.constants.validate()
    }
}

/// Elementwise mean of a batch of signatures
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpectedSignature {
    /// Mean coefficients
    pub values: Vec<f64>,
    /// Signatures averaged
    pub n_reflections: usize,
    /// Truncation level of every averaged signature
    pub truncation_level: usize,
    /// Channels of the streams the signatures were taken of
    pub stream_width: usize,
}

impl ExpectedSignature {
    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no coefficients
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean coefficients
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Running elementwise sum of signatures
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureAccumulator {
    sum: Vec<f64>,
    count: usize,
}

impl SignatureAccumulator {
    /// Accumulator for signatures of `length` coefficients
    pub fn new(length: usize) -> Self {
        Self {
            sum: alloc::vec![0.0; length],
            count: 0,
        }
    }

    /// Fold one signature into the sum
    pub fn add(&mut self, signature: &[f64]) -> EstimatorResult<()> {
        if signature.len() != self.sum.len() {
            return Err(EstimatorError::SignatureLengthMismatch {
                expected: self.sum.len(),
                found: signature.len(),
            });
        }
        for (total, &value) in self.sum.iter_mut().zip(signature) {
            *total += value;
        }
        self.count += 1;
        Ok(())
    }

    /// Fold another partial sum into this one
    pub fn merge(&mut self, other: &SignatureAccumulator) -> EstimatorResult<()> {
        if other.sum.len() != self.sum.len() {
            return Err(EstimatorError::SignatureLengthMismatch {
                expected: self.sum.len(),
                found: other.sum.len(),
            });
        }
        for (total, &value) in self.sum.iter_mut().zip(&other.sum) {
            *total += value;
        }
        self.count += other.count;
        Ok(())
    }

    /// Signatures folded so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Divide the sum by the count
    pub fn finish(self) -> EstimatorResult<Vec<f64>> {
        if self.count == 0 {
            return Err(EstimatorError::EmptyBatch);
        }
        let n = self.count as f64;
        Ok(self.sum.into_iter().map(|total| total / n).collect())
    }
}

/// Signature of one reflection paired with the incident waveform
pub fn signature_for_reflection<B: SignatureBackend + ?Sized>(
    backend: &B,
    transform: StreamTransform,
    incident: &Waveform,
    reflected: &Waveform,
    truncation_level: usize,
) -> EstimatorResult<SignatureVector> {
    let stream = transform.build_stream(incident, reflected)?;
    Ok(backend.compute_signature(&stream, truncation_level)?)
}

/// Mean signature over `reflections`, visiting each exactly once in order
///
/// Only forward iteration is required, so lazy reflection streams are
/// consumed without being materialized.
pub fn estimate_expected_signature<B, I>(
    incident: &Waveform,
    reflections: I,
    truncation_level: usize,
    transform: StreamTransform,
    backend: &B,
) -> EstimatorResult<ExpectedSignature>
where
    B: SignatureBackend + ?Sized,
    I: IntoIterator<Item = Waveform>,
{
    let width = transform.output_width();
    checked_signature_dimension(width, truncation_level)?;
    let mut accumulator =
        SignatureAccumulator::new(backend.signature_length(width, truncation_level));

    for reflected in reflections {
        let signature =
            signature_for_reflection(backend, transform, incident, &reflected, truncation_level)?;
        accumulator.add(signature.as_slice())?;
    }

    let n_reflections = accumulator.count();
    Ok(ExpectedSignature {
        values: accumulator.finish()?,
        n_reflections,
        truncation_level,
        stream_width: width,
    })
}

/// Expected path-signature estimator for one configuration
#[derive(Debug, Clone)]
pub struct SignatureEstimator<B: SignatureBackend = TensorSignature> {
    config: EstimatorConfig,
    incident: Waveform,
    simulator: ReflectionSimulator,
    backend: B,
}

impl SignatureEstimator<TensorSignature> {
    /// Estimator using the built-in signature backend
    pub fn new(config: EstimatorConfig) -> EstimatorResult<Self> {
        Self::with_backend(config, TensorSignature)
    }
}

impl<B: SignatureBackend> SignatureEstimator<B> {
    /// Estimator using a custom signature backend
    pub fn with_backend(config: EstimatorConfig, backend: B) -> EstimatorResult<Self> {
        config.validate()?;

        let noise = config
            .signal_to_noise_ratio_db
            .map(|snr| NoiseModel::from_snr_db(snr, config.constants.amplitude()))
            .transpose()?;
        let simulator = ReflectionSimulator::new(
            config.constants,
            config.n_incident_signals,
            noise,
            config.theta_tolerance,
        );
        let incident = IncidentSignalGenerator::generate(&config.constants);

        log_debug!(
            "Estimator ready: {} reflections of {} samples, level {}, lead-lag {}",
            config.n_incident_signals,
            config.constants.samples_per_waveform(),
            config.truncation_level,
            config.use_lead_lag_transformation
        );

        Ok(Self {
            config,
            incident,
            simulator,
            backend,
        })
    }

    /// Configuration fixed at construction
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Shared incident waveform
    pub fn incident_signal(&self) -> &Waveform {
        &self.incident
    }

    /// Reflection simulator
    pub fn simulator(&self) -> &ReflectionSimulator {
        &self.simulator
    }

    /// Signature backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Length of every signature this estimator produces
    pub fn signature_length(&self) -> usize {
        self.backend.signature_length(
            self.config.stream_transform().output_width(),
            self.config.truncation_level,
        )
    }

    /// Expected signature of any scenario
    pub fn compute_expected_signature(
        &self,
        request: &ScenarioRequest,
    ) -> EstimatorResult<ExpectedSignature> {
        let plan = self.simulator.plan(request)?;
        let transform = self.config.stream_transform();

        let expected = match self.config.execution {
            ExecutionMode::Sequential => estimate_expected_signature(
                &self.incident,
                self.simulator.reflections(plan),
                self.config.truncation_level,
                transform,
                &self.backend,
            ),
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => crate::parallel::estimate_expected_signature_parallel(
                &self.incident,
                &self.simulator,
                &plan,
                self.config.truncation_level,
                transform,
                &self.backend,
            ),
            #[cfg(not(feature = "parallel"))]
            ExecutionMode::Parallel => Err(EstimatorError::InvalidConfiguration {
                reason: "parallel execution requires the `parallel` feature",
            }),
        };

        if let Err(error) = &expected {
            log_warn!("Expected signature failed: {}", error);
        }
        expected
    }

    /// Expected signature of a drone scenario
    pub fn compute_expected_signature_for_drone(
        &self,
        scenario: &DroneScenario,
        seed: Option<u64>,
    ) -> EstimatorResult<ExpectedSignature> {
        self.compute_expected_signature(&ScenarioRequest::drone(*scenario, seed))
    }

    /// Expected signature of a non-drone scenario
    pub fn compute_expected_signature_for_nondrone(
        &self,
        scenario: &NonDroneScenario,
        seed: Option<u64>,
    ) -> EstimatorResult<ExpectedSignature> {
        self.compute_expected_signature(&ScenarioRequest::non_drone(*scenario, seed))
    }

    /// Raw reflection batch of any scenario, without signatures
    pub fn compute_reflected_signals(
        &self,
        request: &ScenarioRequest,
    ) -> EstimatorResult<Vec<Waveform>> {
        match self.config.execution {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => {
                let plan = self.simulator.plan(request)?;
                Ok(crate::parallel::simulate_batch_parallel(&self.simulator, &plan))
            }
            _ => self.simulator.collect(request),
        }
    }

    /// Raw reflection batch of a drone scenario
    pub fn compute_reflected_signals_for_drone(
        &self,
        scenario: &DroneScenario,
        seed: Option<u64>,
    ) -> EstimatorResult<Vec<Waveform>> {
        self.compute_reflected_signals(&ScenarioRequest::drone(*scenario, seed))
    }

    /// Raw reflection batch of a non-drone scenario
    pub fn compute_reflected_signals_for_nondrone(
        &self,
        scenario: &NonDroneScenario,
        seed: Option<u64>,
    ) -> EstimatorResult<Vec<Waveform>> {
        self.compute_reflected_signals(&ScenarioRequest::non_drone(*scenario, seed))
    }
}
