//! Constants for dronesig Core
//!
//! ## Organization
//!
//! - **Physics**: wave speed, carrier frequency, observer geometry
//! - **Simulation**: sampling resolution, batch sizes, tolerances
//!
//! [`PhysicalConstants`] bundles the values one estimator runs with. The
//! derived quantities Ω, K, T and λ are computed on access from F and C and
//! can never drift out of sync with them.

/// Physical constants of the radar wave and observer.
pub mod physics;

/// Sampling, batch and tolerance parameters.
pub mod simulation;

use core::f64::consts::PI;

use crate::errors::{EstimatorError, EstimatorResult};

pub use physics::{
    DEFAULT_AMPLITUDE, DEFAULT_FREQUENCY_HZ, DEFAULT_ORIGIN_POSITION_M, DEFAULT_ORIGIN_TIME_S,
    SPEED_OF_LIGHT_M_PER_S,
};

pub use simulation::{
    DEFAULT_INCIDENT_SIGNALS, DEFAULT_SAMPLES_PER_WAVEFORM, DEFAULT_TRUNCATION_LEVEL,
    DEFAULT_WAVELENGTHS_PER_WAVEFORM, MAX_SIGNATURE_COEFFICIENTS, MIN_SAMPLES_PER_WAVEFORM,
};

/// Immutable physical and sampling parameters of one estimator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalConstants {
    /// Wave propagation speed C (m/s)
    wave_speed: f64,
    /// Incident frequency F (Hz)
    frequency: f64,
    /// Incident amplitude A
    amplitude: f64,
    /// Observer position X0 (m)
    origin_position: f64,
    /// Emission time T0 (s)
    origin_time: f64,
    /// Samples per waveform M
    samples_per_waveform: usize,
    /// Wavelengths per waveform W
    wavelengths_per_waveform: usize,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            wave_speed: SPEED_OF_LIGHT_M_PER_S,
            frequency: DEFAULT_FREQUENCY_HZ,
            amplitude: DEFAULT_AMPLITUDE,
            origin_position: DEFAULT_ORIGIN_POSITION_M,
            origin_time: DEFAULT_ORIGIN_TIME_S,
            samples_per_waveform: DEFAULT_SAMPLES_PER_WAVEFORM,
            wavelengths_per_waveform: DEFAULT_WAVELENGTHS_PER_WAVEFORM,
        }
    }
}

impl PhysicalConstants {
    /// Create a constant set; derived quantities follow from `frequency` and `wave_speed`
    pub fn new(
        wave_speed: f64,
        frequency: f64,
        amplitude: f64,
        origin_position: f64,
        origin_time: f64,
        samples_per_waveform: usize,
        wavelengths_per_waveform: usize,
    ) -> Self {
        Self {
            wave_speed,
            frequency,
            amplitude,
            origin_position,
            origin_time,
            samples_per_waveform,
            wavelengths_per_waveform,
        }
    }

    /// Same physics, different sampling resolution
    pub fn with_sampling(
        mut self,
        samples_per_waveform: usize,
        wavelengths_per_waveform: usize,
    ) -> Self {
        self.samples_per_waveform = samples_per_waveform;
        self.wavelengths_per_waveform = wavelengths_per_waveform;
        self
    }

    /// Check that every waveform built from these constants is well defined
    pub fn validate(&self) -> EstimatorResult<()> {
        if !(self.wave_speed.is_finite() && self.wave_speed > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "wave speed must be positive and finite",
            });
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "frequency must be positive and finite",
            });
        }
        if !(self.amplitude.is_finite() && self.amplitude > 0.0) {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "amplitude must be positive and finite",
            });
        }
        if !(self.origin_position.is_finite() && self.origin_time.is_finite()) {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "origin position and time must be finite",
            });
        }
        if self.samples_per_waveform < MIN_SAMPLES_PER_WAVEFORM {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "waveforms need at least 2 samples",
            });
        }
        if self.wavelengths_per_waveform == 0 {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "waveforms must span at least one wavelength",
            });
        }
        Ok(())
    }

    /// Wave propagation speed C (m/s)
    pub fn wave_speed(&self) -> f64 {
        self.wave_speed
    }

    /// Incident frequency F (Hz)
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Angular frequency Ω = 2πF (rad/s)
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI * self.frequency
    }

    /// Wavenumber K = Ω/C (rad/m)
    pub fn wavenumber(&self) -> f64 {
        self.angular_frequency() / self.wave_speed
    }

    /// Period T = 1/F (s)
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    /// Wavelength λ = C/F (m)
    pub fn wavelength(&self) -> f64 {
        self.wave_speed / self.frequency
    }

    /// Incident amplitude A
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Observer position X0 (m)
    pub fn origin_position(&self) -> f64 {
        self.origin_position
    }

    /// Emission time T0 (s)
    pub fn origin_time(&self) -> f64 {
        self.origin_time
    }

    /// Samples per waveform M
    pub fn samples_per_waveform(&self) -> usize {
        self.samples_per_waveform
    }

    /// Wavelengths per waveform W
    pub fn wavelengths_per_waveform(&self) -> usize {
        self.wavelengths_per_waveform
    }
}
