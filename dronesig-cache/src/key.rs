//! Deterministic cache keys

use std::fmt;

use dronesig_core::{EstimatorConfig, ExecutionMode, ScenarioParameters, ScenarioRequest};
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::CacheError;

/// Cached operation, part of the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    /// Expected signature of a drone scenario
    ExpectedSignatureForDrone,
    /// Expected signature of a non-drone scenario
    ExpectedSignatureForNonDrone,
}

impl CacheOperation {
    /// Stable name hashed into the key
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpectedSignatureForDrone => "compute_expected_signature_for_drone",
            Self::ExpectedSignatureForNonDrone => "compute_expected_signature_for_nondrone",
        }
    }

    /// Operation answering `parameters`
    pub fn for_parameters(parameters: &ScenarioParameters) -> Self {
        match parameters {
            ScenarioParameters::Drone(_) => Self::ExpectedSignatureForDrone,
            ScenarioParameters::NonDrone(_) => Self::ExpectedSignatureForNonDrone,
        }
    }
}

/// Lowercase hex SHA-256 of the canonical request document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for `request` evaluated under `config`
    pub fn for_request(
        config: &EstimatorConfig,
        request: &ScenarioRequest,
    ) -> Result<Self, CacheError> {
        let operation = CacheOperation::for_parameters(&request.parameters);
        let mut arguments = serde_json::to_value(&request.parameters)?;
        if let Some(object) = arguments.as_object_mut() {
            // The operation name already carries the class tag
            object.remove("class");
            object.insert("seed".to_owned(), json!(request.seed));
        }
        Self::from_parts(config, operation, &arguments)
    }

    /// Key for an arbitrary argument document
    pub fn from_parts<A: Serialize>(
        config: &EstimatorConfig,
        operation: CacheOperation,
        arguments: &A,
    ) -> Result<Self, CacheError> {
        let config = config.with_execution(ExecutionMode::Sequential);
        // Value maps are BTreeMaps, so serialization sorts keys at every depth
        let document = json!({
            "arguments": serde_json::to_value(arguments)?,
            "config": serde_json::to_value(config)?,
            "operation": operation.name(),
        });
        let canonical = serde_json::to_string(&document)?;
        Ok(Self(hex::encode(Sha256::digest(canonical.as_bytes()))))
    }

    /// Hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronesig_core::{DroneScenario, NonDroneScenario};

    fn drone_request(seed: Option<u64>) -> ScenarioRequest {
        ScenarioRequest::drone(DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.5), seed)
    }

    #[test]
    fn test_key_is_stable_hex() {
        let config = EstimatorConfig::quick();
        let a = CacheKey::for_request(&config, &drone_request(Some(1))).unwrap();
        let b = CacheKey::for_request(&config, &drone_request(Some(1))).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_covers_every_input() {
        let config = EstimatorConfig::quick();
        let base = CacheKey::for_request(&config, &drone_request(Some(1))).unwrap();

        let other_seed = CacheKey::for_request(&config, &drone_request(Some(2))).unwrap();
        let no_seed = CacheKey::for_request(&config, &drone_request(None)).unwrap();
        let deeper = config.with_truncation_level(3);
        let other_config = CacheKey::for_request(&deeper, &drone_request(Some(1))).unwrap();
        let other_scenario = CacheKey::for_request(
            &config,
            &ScenarioRequest::drone(DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.6), Some(1)),
        )
        .unwrap();

        for key in [other_seed, no_seed, other_config, other_scenario] {
            assert_ne!(key, base);
        }
    }

    #[test]
    fn test_key_separates_operations() {
        let config = EstimatorConfig::quick();
        let nondrone = ScenarioRequest::non_drone(NonDroneScenario::new(10.0, 100.0), Some(1));
        let drone = drone_request(Some(1));

        assert_eq!(
            CacheOperation::for_parameters(&nondrone.parameters),
            CacheOperation::ExpectedSignatureForNonDrone
        );
        assert_ne!(
            CacheKey::for_request(&config, &nondrone).unwrap(),
            CacheKey::for_request(&config, &drone).unwrap()
        );
    }

    #[test]
    fn test_key_ignores_execution_mode() {
        let config = EstimatorConfig::quick();
        let parallel = config.with_execution(ExecutionMode::Parallel);

        assert_eq!(
            CacheKey::for_request(&config, &drone_request(Some(4))).unwrap(),
            CacheKey::for_request(&parallel, &drone_request(Some(4))).unwrap()
        );
    }
}
