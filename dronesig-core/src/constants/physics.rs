//! Physical Constants for the Radar Model
//!
//! Fundamental values for the incident wave. Derived quantities (angular
//! frequency, wavenumber, period, wavelength) are deliberately absent: they
//! are always recomputed from frequency and wave speed by
//! [`PhysicalConstants`](super::PhysicalConstants).

// ===== WAVE PROPAGATION =====

/// Speed of light in vacuum (m/s).
///
/// Propagation speed of the radar wave.
///
/// Source: SI definition of the metre (exact)
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

/// Frequency of the incident signal (Hz).
///
/// 1 GHz carrier, giving a 1 ns period and a wavelength of ~0.3 m, which is
/// the same order as small rotor blades.
pub const DEFAULT_FREQUENCY_HZ: f64 = 1.0e9;

/// Amplitude of the incident signal (arbitrary units).
pub const DEFAULT_AMPLITUDE: f64 = 1.0;

// ===== OBSERVER GEOMETRY =====

/// Position of the emitter/receiver along the propagation axis (m).
///
/// Signals are emitted and received at the observer.
pub const DEFAULT_ORIGIN_POSITION_M: f64 = 0.0;

/// Emission time of the incident signal (s).
pub const DEFAULT_ORIGIN_TIME_S: f64 = 0.0;

// ===== UNIT CONVERSIONS =====

/// Seconds per minute, for rpm to rev/s.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Degrees in a full revolution.
pub const DEGREES_PER_REVOLUTION: f64 = 360.0;

/// Blade angles at which the bounce point moves purely tangentially (deg).
pub const TANGENTIAL_BLADE_ANGLES_DEG: [f64; 2] = [90.0, 270.0];
