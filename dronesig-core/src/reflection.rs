//! Reflection simulator
//!
//! Turns a scenario into a lazy batch of reflected waveforms, one per
//! simulated bounce of the incident signal.
//!
//! ## Physical model
//!
//! A reflector at offset `r0` moving with velocity `v` along the propagation
//! axis returns a copy of the incident sinusoid that is
//! - time-scaled by the relativistic Doppler factor `s = (1 − v/C)/(1 + v/C)`
//! - delayed by the round trip `2(r0 − v·T0)/(s·C·(1 + v/C))`
//! - phase-shifted by `2K(r0 − v·T0)/(1 + v/C)` and inverted with amplitude `s·A`
//!
//! A propeller bounce hits the blade at a uniformly random angle `theta`
//! and radial position `p`, adding the rotational speed `p·2π·rpm/60` to the
//! body speed. When the blade points at 90° or 270° the bounce point moves
//! tangentially and only the body speed remains.
//!
//! ## Randomness
//!
//! Reflection `i` of a batch draws from its own `ChaCha8Rng`, seeded with the
//! scenario seed and moved to stream `i`. Each reflection is therefore a pure
//! function of `(scenario, seed, i)`: batches are reproducible whatever order
//! or worker count they are generated with.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::iter::FusedIterator;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::physics::{
    DEGREES_PER_REVOLUTION, SECONDS_PER_MINUTE, TANGENTIAL_BLADE_ANGLES_DEG,
};
use crate::constants::simulation::{
    BODY_REFLECTION_DIAMETER_M, DECIBELS_PER_DECADE, THETA_ABSOLUTE_TOLERANCE_DEG,
    THETA_RELATIVE_TOLERANCE,
};
use crate::constants::PhysicalConstants;
use crate::errors::{EstimatorError, EstimatorResult};
use crate::scenario::{DroneScenario, ScenarioParameters, ScenarioRequest};
use crate::signal::Waveform;

/// Closeness test used to detect tangential blade angles
///
/// `a` is close to `b` when `|a − b| ≤ absolute + relative·|b|`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleTolerance {
    /// Tolerance relative to the reference angle
    pub relative: f64,
    /// Absolute tolerance (deg)
    pub absolute: f64,
}

impl Default for AngleTolerance {
    fn default() -> Self {
        Self {
            relative: THETA_RELATIVE_TOLERANCE,
            absolute: THETA_ABSOLUTE_TOLERANCE_DEG,
        }
    }
}

impl AngleTolerance {
    /// Create a tolerance
    pub const fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    /// Exact comparison only
    pub const fn exact() -> Self {
        Self::new(0.0, 0.0)
    }

    /// True when `angle` is within tolerance of `reference`
    pub fn is_close(&self, angle: f64, reference: f64) -> bool {
        libm::fabs(angle - reference) <= self.absolute + self.relative * libm::fabs(reference)
    }

    /// True when `theta_deg` is a tangential blade angle
    pub fn is_tangential(&self, theta_deg: f64) -> bool {
        TANGENTIAL_BLADE_ANGLES_DEG
            .iter()
            .any(|&reference| self.is_close(theta_deg, reference))
    }

    /// Both tolerances finite and non-negative
    pub fn validate(&self) -> EstimatorResult<()> {
        let valid = |x: f64| x.is_finite() && x >= 0.0;
        if valid(self.relative) && valid(self.absolute) {
            Ok(())
        } else {
            Err(EstimatorError::InvalidConfiguration {
                reason: "angle tolerances must be finite and non-negative",
            })
        }
    }
}

/// Where and how fast one bounce happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionGeometry {
    /// Translational speed of the object (m/s)
    pub speed: f64,
    /// Propeller speed (rpm), 0 for body hits
    pub rpm: f64,
    /// Distance of the object from the observer (m)
    pub distance: f64,
    /// Blade diameter (m)
    pub diameter: f64,
    /// Blade angle at bounce time (deg)
    pub theta_deg: f64,
    /// Radial position of the bounce point along the blade (m)
    pub radial_position: f64,
}

impl ReflectionGeometry {
    /// Bounce off a body: no rotation, no angular or radial offset
    pub fn body(speed: f64, distance: f64) -> Self {
        Self {
            speed,
            rpm: 0.0,
            distance,
            diameter: BODY_REFLECTION_DIAMETER_M,
            theta_deg: 0.0,
            radial_position: 0.0,
        }
    }

    /// Bounce off a propeller blade at `theta_deg`, `radial_position` from the hub
    pub fn propeller(drone: &DroneScenario, theta_deg: f64, radial_position: f64) -> Self {
        Self {
            speed: drone.speed,
            rpm: drone.rpm,
            distance: drone.distance,
            diameter: drone.blade_diameter,
            theta_deg,
            radial_position,
        }
    }
}

/// Effective motion of the bounce point and the resulting sampling window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionKinematics {
    /// Effective reflector velocity `v` (m/s)
    pub velocity: f64,
    /// Radial offset `r0` of the bounce point (m)
    pub radial_offset: f64,
    /// Relativistic Doppler scaling factor `s`
    pub doppler_scale: f64,
    /// Start of the reflected window `t3` (s)
    pub window_start: f64,
    /// End of the reflected window `t4` (s)
    pub window_end: f64,
}

impl ReflectionKinematics {
    /// Resolve velocity, offset, Doppler factor and time window of a bounce
    pub fn compute(
        geometry: &ReflectionGeometry,
        constants: &PhysicalConstants,
        tolerance: &AngleTolerance,
    ) -> Self {
        let (velocity, radial_offset) = if tolerance.is_tangential(geometry.theta_deg) {
            (geometry.speed, geometry.distance - geometry.diameter / 2.0)
        } else {
            let revolutions_per_second = geometry.rpm / SECONDS_PER_MINUTE;
            let rotational = geometry.radial_position * revolutions_per_second * 2.0 * PI;
            let theta_rad = geometry.theta_deg * PI / (DEGREES_PER_REVOLUTION / 2.0);
            (
                geometry.speed + rotational,
                geometry.radial_position * libm::sin(theta_rad) + geometry.distance,
            )
        };

        let c = constants.wave_speed();
        let beta = velocity / c;
        let doppler_scale = (1.0 - beta) / (1.0 + beta);

        let window_start = -(constants.origin_position() / c)
            + 2.0 * (radial_offset - velocity * constants.origin_time())
                / (doppler_scale * c * (1.0 + beta));
        let scaled_period = constants.period() / doppler_scale;
        let window_end = window_start + constants.wavelengths_per_waveform() as f64 * scaled_period;

        Self {
            velocity,
            radial_offset,
            doppler_scale,
            window_start,
            window_end,
        }
    }
}

/// Noise-free reflected waveform for one bounce
pub fn compute_reflected_signal(
    geometry: &ReflectionGeometry,
    constants: &PhysicalConstants,
    tolerance: &AngleTolerance,
) -> Waveform {
    let kinematics = ReflectionKinematics::compute(geometry, constants, tolerance);

    let s = kinematics.doppler_scale;
    let beta = kinematics.velocity / constants.wave_speed();
    let amplitude = -s * constants.amplitude();
    let omega = constants.angular_frequency();
    let k = constants.wavenumber();
    let origin_phase = k * constants.origin_position();
    let round_trip_phase = 2.0
        * k
        * (kinematics.radial_offset - kinematics.velocity * constants.origin_time())
        / (1.0 + beta);

    Waveform::sample(
        kinematics.window_start,
        kinematics.window_end,
        constants.samples_per_waveform(),
        |t| amplitude * libm::sin(s * (omega * t + origin_phase) - round_trip_phase),
    )
}

/// Additive white Gaussian noise at a fixed signal-to-noise ratio
#[derive(Debug, Clone, Copy)]
pub struct NoiseModel {
    noise_power: f64,
    distribution: Normal<f64>,
}

impl NoiseModel {
    /// Noise for `snr_db` relative to an incident sinusoid of `amplitude`
    ///
    /// `noise_power = (A²/2) / 10^(SNR/10)`.
    pub fn from_snr_db(snr_db: f64, amplitude: f64) -> EstimatorResult<Self> {
        if !snr_db.is_finite() {
            return Err(EstimatorError::InvalidConfiguration {
                reason: "signal-to-noise ratio must be finite",
            });
        }
        let signal_power = amplitude * amplitude / 2.0;
        let noise_power = signal_power / libm::pow(10.0, snr_db / DECIBELS_PER_DECADE);
        let distribution = Normal::new(0.0, libm::sqrt(noise_power)).map_err(|_| {
            EstimatorError::InvalidConfiguration {
                reason: "noise standard deviation must be finite",
            }
        })?;
        Ok(Self {
            noise_power,
            distribution,
        })
    }

    /// Mean noise power per sample
    pub fn noise_power(&self) -> f64 {
        self.noise_power
    }

    /// Standard deviation of each noise sample
    pub fn std_dev(&self) -> f64 {
        libm::sqrt(self.noise_power)
    }

    /// Add an independent draw to every sample
    pub fn apply<R: Rng + ?Sized>(&self, waveform: &mut Waveform, rng: &mut R) {
        for amplitude in waveform.amplitudes_mut() {
            *amplitude += self.distribution.sample(rng);
        }
    }
}

/// Which part of the object a reflection bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionKind {
    /// Spinning propeller blade
    Propeller,
    /// Body
    Body,
}

/// A validated scenario with its seed resolved, ready to generate reflections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionPlan {
    parameters: ScenarioParameters,
    n_propeller: usize,
    n_body: usize,
    seed: u64,
}

impl ReflectionPlan {
    /// Reflections in the batch
    pub fn len(&self) -> usize {
        self.n_propeller + self.n_body
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Propeller reflections, generated first
    pub fn n_propeller(&self) -> usize {
        self.n_propeller
    }

    /// Body reflections, generated after the propeller ones
    pub fn n_body(&self) -> usize {
        self.n_body
    }

    /// Seed every reflection generator derives from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Scenario being simulated
    pub fn parameters(&self) -> &ScenarioParameters {
        &self.parameters
    }

    /// Kind of reflection `index`
    pub fn kind_at(&self, index: usize) -> ReflectionKind {
        if index < self.n_propeller {
            ReflectionKind::Propeller
        } else {
            ReflectionKind::Body
        }
    }
}

/// Generator of reflected waveforms for one estimator configuration
#[derive(Debug, Clone)]
pub struct ReflectionSimulator {
    constants: PhysicalConstants,
    n_incident_signals: usize,
    noise: Option<NoiseModel>,
    tolerance: AngleTolerance,
}

impl ReflectionSimulator {
    /// Simulator producing `n_incident_signals` reflections per scenario
    pub fn new(
        constants: PhysicalConstants,
        n_incident_signals: usize,
        noise: Option<NoiseModel>,
        tolerance: AngleTolerance,
    ) -> Self {
        Self {
            constants,
            n_incident_signals,
            noise,
            tolerance,
        }
    }

    /// Constants the waveforms are generated with
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Reflections per scenario
    pub fn n_incident_signals(&self) -> usize {
        self.n_incident_signals
    }

    /// Noise model, if one is configured
    pub fn noise(&self) -> Option<&NoiseModel> {
        self.noise.as_ref()
    }

    /// Validate a request and resolve its seed
    pub fn plan(&self, request: &ScenarioRequest) -> EstimatorResult<ReflectionPlan> {
        request.parameters.validate()?;

        if request.parameters.peak_reflector_speed() >= self.constants.wave_speed() {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "reflector speed must stay below the wave propagation speed",
            });
        }

        let (n_propeller, n_body) = match &request.parameters {
            ScenarioParameters::Drone(drone) => {
                let split = drone.split(self.n_incident_signals);
                (split.n_propeller, split.n_body)
            }
            ScenarioParameters::NonDrone(_) => (0, self.n_incident_signals),
        };

        let seed = resolve_seed(request.seed)?;
        log_debug!(
            "Planned {} propeller + {} body reflections (seed {})",
            n_propeller,
            n_body,
            seed
        );

        Ok(ReflectionPlan {
            parameters: request.parameters,
            n_propeller,
            n_body,
            seed,
        })
    }

    /// Reflection `index` of `plan`, independent of every other index
    pub fn reflection_at(&self, plan: &ReflectionPlan, index: usize) -> Waveform {
        let mut rng = reflection_rng(plan.seed, index);

        let geometry = match (plan.kind_at(index), &plan.parameters) {
            (ReflectionKind::Propeller, ScenarioParameters::Drone(drone)) => {
                let theta_deg = rng.gen_range(0.0..DEGREES_PER_REVOLUTION);
                let radial_position = rng.gen_range(0.0..drone.blade_length());
                ReflectionGeometry::propeller(drone, theta_deg, radial_position)
            }
            (_, parameters) => ReflectionGeometry::body(parameters.speed(), parameters.distance()),
        };

        let mut waveform = compute_reflected_signal(&geometry, &self.constants, &self.tolerance);
        if let Some(noise) = &self.noise {
            noise.apply(&mut waveform, &mut rng);
        }
        waveform
    }

    /// Lazy, forward-only batch of reflections for `plan`
    pub fn reflections(&self, plan: ReflectionPlan) -> ReflectionStream<'_> {
        ReflectionStream {
            simulator: self,
            plan,
            next: 0,
        }
    }

    /// Validate `request` and return its lazy reflection batch
    pub fn simulate(&self, request: &ScenarioRequest) -> EstimatorResult<ReflectionStream<'_>> {
        Ok(self.reflections(self.plan(request)?))
    }

    /// Materialize the whole batch
    pub fn collect(&self, request: &ScenarioRequest) -> EstimatorResult<Vec<Waveform>> {
        Ok(self.simulate(request)?.collect())
    }
}

/// Lazy iterator over the reflections of one scenario
///
/// Yields propeller reflections first, then body reflections.
pub struct ReflectionStream<'a> {
    simulator: &'a ReflectionSimulator,
    plan: ReflectionPlan,
    next: usize,
}

impl ReflectionStream<'_> {
    /// Plan being iterated
    pub fn plan(&self) -> &ReflectionPlan {
        &self.plan
    }
}

impl Iterator for ReflectionStream<'_> {
    type Item = Waveform;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.plan.len() {
            return None;
        }
        let waveform = self.simulator.reflection_at(&self.plan, self.next);
        log_trace!("Generated reflection {} of {}", self.next + 1, self.plan.len());
        self.next += 1;
        Some(waveform)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReflectionStream<'_> {}

impl FusedIterator for ReflectionStream<'_> {}

/// Generator for reflection `index`: the scenario seed on stream `index`
pub fn reflection_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

#[cfg(feature = "std")]
fn resolve_seed(seed: Option<u64>) -> EstimatorResult<u64> {
    Ok(seed.unwrap_or_else(rand::random))
}

#[cfg(not(feature = "std"))]
fn resolve_seed(seed: Option<u64>) -> EstimatorResult<u64> {
    seed.ok_or(EstimatorError::InvalidScenarioParameters {
        reason: "a seed is required without an entropy source",
    })
}
