//! Sampled waveforms and the incident signal
//!
//! A [`Waveform`] is a finite window of a continuous signal sampled on an
//! evenly spaced time grid. The incident waveform is generated once per
//! estimator and shared by every reflection of every scenario.

use alloc::vec::Vec;

use crate::constants::PhysicalConstants;

/// Ordered `(time, amplitude)` samples of a signal
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waveform {
    times: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl Waveform {
    /// Pair timestamps with amplitudes
    ///
    /// Returns `None` when the two sequences differ in length.
    pub fn new(times: Vec<f64>, amplitudes: Vec<f64>) -> Option<Self> {
        if times.len() != amplitudes.len() {
            return None;
        }
        Some(Self { times, amplitudes })
    }

    /// Sample `signal` at `n` evenly spaced instants over `[start, stop]`
    pub fn sample<F>(start: f64, stop: f64, n: usize, mut signal: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let times = linspace(start, stop, n);
        let amplitudes = times.iter().map(|&t| signal(t)).collect();
        Self { times, amplitudes }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// True when the waveform holds no samples
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Sample timestamps (s)
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample amplitudes
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Mutable amplitudes, used to superimpose noise
    pub fn amplitudes_mut(&mut self) -> &mut [f64] {
        &mut self.amplitudes
    }

    /// `(time, amplitude)` of sample `index`
    pub fn sample_at(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.times.get(index)?, *self.amplitudes.get(index)?))
    }

    /// Length of the sampled window (s)
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Split back into `(times, amplitudes)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.amplitudes)
    }
}

/// `n` evenly spaced values over `[start, stop]`, both endpoints included
///
/// The last value is pinned to `stop` so accumulated rounding never moves
/// the end of the window.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => alloc::vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Generator for the pure sinusoid emitted by the radar
pub struct IncidentSignalGenerator;

impl IncidentSignalGenerator {
    /// `A·sin(Ω·t − K·X0)` sampled `M` times over `[X0/C, X0/C + W·T]`
    pub fn generate(constants: &PhysicalConstants) -> Waveform {
        let start = constants.origin_position() / constants.wave_speed();
        let stop = start + constants.wavelengths_per_waveform() as f64 * constants.period();

        let amplitude = constants.amplitude();
        let omega = constants.angular_frequency();
        let phase = constants.wavenumber() * constants.origin_position();

        Waveform::sample(start, stop, constants.samples_per_waveform(), |t| {
            amplitude * libm::sin(omega * t - phase)
        })
    }
}
