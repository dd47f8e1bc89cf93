//! Expected signatures of a drone and a bird at the same range
//!
//! Run with: cargo run -p dronesig-core --example 01_expected_signature

use dronesig_core::{
    signature_keys, DroneScenario, EstimatorConfig, EstimatorResult, NonDroneScenario,
    PhysicalConstants, SignatureEstimator,
};

fn main() -> EstimatorResult<()> {
    let config = EstimatorConfig::default()
        .with_incident_signals(200)
        .with_truncation_level(2)
        .with_constants(PhysicalConstants::default().with_sampling(10_000, 100));
    let estimator = SignatureEstimator::new(config)?;

    let drone = DroneScenario::new(6000.0, 10.0, 0.3, 100.0, 0.5);
    let bird = NonDroneScenario::new(10.0, 100.0);

    let drone_signature = estimator.compute_expected_signature_for_drone(&drone, Some(7))?;
    let bird_signature = estimator.compute_expected_signature_for_nondrone(&bird, Some(7))?;

    println!("{:>10} {:>14} {:>14}", "word", "drone", "non-drone");
    let keys = signature_keys(3, config.truncation_level);
    for (key, (d, b)) in keys
        .split(' ')
        .zip(drone_signature.values.iter().zip(&bird_signature.values))
    {
        println!("{:>10} {:>14.6e} {:>14.6e}", key, d, b);
    }
    Ok(())
}
