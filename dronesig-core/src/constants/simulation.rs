//! Simulation Parameters
//!
//! Sampling resolution, batch sizes and the numeric tolerances of the
//! reflection model.

// ===== SAMPLING =====

/// Samples per generated waveform.
///
/// 100 samples per wavelength over 1000 wavelengths.
pub const DEFAULT_SAMPLES_PER_WAVEFORM: usize = 100_000;

/// Wavelengths covered by each generated waveform.
pub const DEFAULT_WAVELENGTHS_PER_WAVEFORM: usize = 1_000;

/// Smallest waveform that still forms a path with one increment.
pub const MIN_SAMPLES_PER_WAVEFORM: usize = 2;

// ===== ESTIMATOR =====

/// Reflections averaged per expected signature.
pub const DEFAULT_INCIDENT_SIGNALS: usize = 3_000;

/// Default path-signature truncation level.
pub const DEFAULT_TRUNCATION_LEVEL: usize = 3;

/// Largest signature accepted, in coefficients (128 MiB of `f64`).
pub const MAX_SIGNATURE_COEFFICIENTS: usize = 1 << 24;

// ===== BODY REFLECTIONS =====

/// Nominal diameter used for body reflections (m).
///
/// Only enters the blade-tip branch of the model, which a body reflection
/// (theta = 0) never takes.
pub const BODY_REFLECTION_DIAMETER_M: f64 = 1.0;

// ===== BLADE ANGLE CLOSENESS =====

/// Relative tolerance when comparing a sampled blade angle to 90°/270°.
pub const THETA_RELATIVE_TOLERANCE: f64 = 1.0e-5;

/// Absolute tolerance when comparing a sampled blade angle to 90°/270° (deg).
pub const THETA_ABSOLUTE_TOLERANCE_DEG: f64 = 1.0e-8;

// ===== NOISE =====

/// Decibels per decade of power ratio.
pub const DECIBELS_PER_DECADE: f64 = 10.0;
