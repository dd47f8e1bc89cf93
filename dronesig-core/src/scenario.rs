//! Physical scenarios
//!
//! A scenario fixes the object class and its kinematics. Together with an
//! optional seed it fully determines the batch of simulated reflections.

use crate::constants::physics::SECONDS_PER_MINUTE;
use crate::errors::{EstimatorError, EstimatorResult};

/// Rotorcraft: a translating body carrying one spinning propeller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroneScenario {
    /// Propeller rotation speed (revolutions per minute)
    pub rpm: f64,
    /// Translational speed along the propagation axis (m/s)
    pub speed: f64,
    /// Propeller blade diameter (m)
    pub blade_diameter: f64,
    /// Signed offset from the observer along the propagation axis (m)
    pub distance: f64,
    /// Share of incident signals that bounce off the body rather than the propeller
    pub body_hit_proportion: f64,
}

/// Object without periodic micro-motion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonDroneScenario {
    /// Translational speed along the propagation axis (m/s)
    pub speed: f64,
    /// Signed offset from the observer along the propagation axis (m)
    pub distance: f64,
}

/// How a drone batch divides between propeller and body hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionSplit {
    /// Reflections off the spinning propeller
    pub n_propeller: usize,
    /// Reflections off the body
    pub n_body: usize,
}

impl ReflectionSplit {
    /// Total reflections in the batch
    pub fn total(&self) -> usize {
        self.n_propeller + self.n_body
    }
}

impl DroneScenario {
    /// Create a drone scenario
    pub fn new(
        rpm: f64,
        speed: f64,
        blade_diameter: f64,
        distance: f64,
        body_hit_proportion: f64,
    ) -> Self {
        Self {
            rpm,
            speed,
            blade_diameter,
            distance,
            body_hit_proportion,
        }
    }

    /// Blade length, the radius swept by the propeller (m)
    pub fn blade_length(&self) -> f64 {
        self.blade_diameter / 2.0
    }

    /// Check kinematics against their physical domain
    pub fn validate(&self) -> EstimatorResult<()> {
        if !(self.rpm.is_finite()
            && self.speed.is_finite()
            && self.blade_diameter.is_finite()
            && self.distance.is_finite()
            && self.body_hit_proportion.is_finite())
        {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "drone parameters must be finite",
            });
        }
        if self.rpm < 0.0 {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "rpm must be non-negative",
            });
        }
        if self.blade_diameter <= 0.0 {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "blade diameter must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.body_hit_proportion) {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "body hit proportion must lie in [0, 1]",
            });
        }
        Ok(())
    }

    /// Split `n_incident_signals` into propeller and body reflections
    ///
    /// `n_body = floor(n · proportion)`, the propeller takes the rest.
    pub fn split(&self, n_incident_signals: usize) -> ReflectionSplit {
        let n_body = (libm::floor(n_incident_signals as f64 * self.body_hit_proportion) as usize)
            .min(n_incident_signals);
        ReflectionSplit {
            n_propeller: n_incident_signals - n_body,
            n_body,
        }
    }
}

impl NonDroneScenario {
    /// Create a non-drone scenario
    pub fn new(speed: f64, distance: f64) -> Self {
        Self { speed, distance }
    }

    /// Check kinematics against their physical domain
    pub fn validate(&self) -> EstimatorResult<()> {
        if !(self.speed.is_finite() && self.distance.is_finite()) {
            return Err(EstimatorError::InvalidScenarioParameters {
                reason: "non-drone parameters must be finite",
            });
        }
        Ok(())
    }
}

/// Object class plus kinematics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "class", rename_all = "snake_case"))]
pub enum ScenarioParameters {
    /// Rotorcraft
    Drone(DroneScenario),
    /// Non-rotorcraft
    NonDrone(NonDroneScenario),
}

impl ScenarioParameters {
    /// Check kinematics against their physical domain
    pub fn validate(&self) -> EstimatorResult<()> {
        match self {
            Self::Drone(drone) => drone.validate(),
            Self::NonDrone(object) => object.validate(),
        }
    }

    /// Translational speed of the object (m/s)
    pub fn speed(&self) -> f64 {
        match self {
            Self::Drone(drone) => drone.speed,
            Self::NonDrone(object) => object.speed,
        }
    }

    /// Distance from the observer (m)
    pub fn distance(&self) -> f64 {
        match self {
            Self::Drone(drone) => drone.distance,
            Self::NonDrone(object) => object.distance,
        }
    }

    /// Fastest speed any bounce point can reach (m/s)
    ///
    /// The blade tip adds `(d/2)·2π·rpm/60` to the body speed.
    pub fn peak_reflector_speed(&self) -> f64 {
        match self {
            Self::Drone(drone) => {
                let revolutions_per_second = drone.rpm / SECONDS_PER_MINUTE;
                let tip_speed =
                    drone.blade_length() * revolutions_per_second * 2.0 * core::f64::consts::PI;
                libm::fabs(drone.speed) + tip_speed
            }
            Self::NonDrone(object) => libm::fabs(object.speed),
        }
    }
}

impl From<DroneScenario> for ScenarioParameters {
    fn from(drone: DroneScenario) -> Self {
        Self::Drone(drone)
    }
}

impl From<NonDroneScenario> for ScenarioParameters {
    fn from(object: NonDroneScenario) -> Self {
        Self::NonDrone(object)
    }
}

/// One estimator call: scenario plus optional seed
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioRequest {
    /// Object class and kinematics
    pub parameters: ScenarioParameters,
    /// Seed for reproducible draws; `None` draws a fresh one
    pub seed: Option<u64>,
}

impl ScenarioRequest {
    /// Request for `parameters` with an optional seed
    pub fn new(parameters: impl Into<ScenarioParameters>, seed: Option<u64>) -> Self {
        Self {
            parameters: parameters.into(),
            seed,
        }
    }

    /// Drone request
    pub fn drone(scenario: DroneScenario, seed: Option<u64>) -> Self {
        Self::new(scenario, seed)
    }

    /// Non-drone request
    pub fn non_drone(scenario: NonDroneScenario, seed: Option<u64>) -> Self {
        Self::new(scenario, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadcopter() -> DroneScenario {
        DroneScenario::new(6000.0, 5.0, 0.25, 80.0, 0.4)
    }

    #[test]
    fn split_floors_body_share() {
        let split = quadcopter().split(10);
        assert_eq!(split.n_body, 4);
        assert_eq!(split.n_propeller, 6);

        let split = DroneScenario::new(1.0, 0.0, 1.0, 0.0, 0.333).split(10);
        assert_eq!(split.n_body, 3);
        assert_eq!(split.total(), 10);
    }

    #[test]
    fn split_extremes() {
        let all_body = DroneScenario::new(1.0, 0.0, 1.0, 0.0, 1.0).split(7);
        assert_eq!((all_body.n_propeller, all_body.n_body), (0, 7));

        let all_propeller = DroneScenario::new(1.0, 0.0, 1.0, 0.0, 0.0).split(7);
        assert_eq!((all_propeller.n_propeller, all_propeller.n_body), (7, 0));
    }

    #[test]
    fn rejects_out_of_domain_drones() {
        assert!(quadcopter().validate().is_ok());

        let mut negative_diameter = quadcopter();
        negative_diameter.blade_diameter = -0.1;
        assert!(matches!(
            negative_diameter.validate(),
            Err(EstimatorError::InvalidScenarioParameters { .. })
        ));

        let mut zero_diameter = quadcopter();
        zero_diameter.blade_diameter = 0.0;
        assert!(zero_diameter.validate().is_err());

        let mut proportion = quadcopter();
        proportion.body_hit_proportion = 1.01;
        assert!(proportion.validate().is_err());
        proportion.body_hit_proportion = -0.01;
        assert!(proportion.validate().is_err());

        let mut rpm = quadcopter();
        rpm.rpm = -1.0;
        assert!(rpm.validate().is_err());

        let mut nan = quadcopter();
        nan.distance = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn negative_distance_is_allowed() {
        let mut behind = quadcopter();
        behind.distance = -50.0;
        assert!(behind.validate().is_ok());
        assert!(NonDroneScenario::new(-3.0, -50.0).validate().is_ok());
    }

    #[test]
    fn peak_speed_includes_blade_tip() {
        let params = ScenarioParameters::from(DroneScenario::new(60.0, 2.0, 2.0, 0.0, 0.0));
        // One revolution per second with a 1 m blade: tip moves at 2π m/s
        let expected = 2.0 + 2.0 * core::f64::consts::PI;
        assert!((params.peak_reflector_speed() - expected).abs() < 1e-12);

        let params = ScenarioParameters::from(NonDroneScenario::new(-4.0, 10.0));
        assert_eq!(params.peak_reflector_speed(), 4.0);
    }
}
