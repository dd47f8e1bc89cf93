//! Inspect a raw batch of drone reflections
//!
//! Run with: cargo run -p dronesig-core --example 02_reflection_batch

use dronesig_core::{
    DroneScenario, EstimatorResult, NoiseModel, PhysicalConstants, ScenarioRequest,
    ReflectionSimulator,
};

fn main() -> EstimatorResult<()> {
    let constants = PhysicalConstants::default().with_sampling(2_000, 20);
    let noise = NoiseModel::from_snr_db(15.0, constants.amplitude())?;
    let simulator = ReflectionSimulator::new(constants, 12, Some(noise), Default::default());

    let drone = DroneScenario::new(8000.0, 15.0, 0.35, 150.0, 0.25);
    let batch = simulator.simulate(&ScenarioRequest::drone(drone, Some(2024)))?;
    let plan = *batch.plan();

    println!(
        "{} propeller + {} body reflections, noise power {:.3e}",
        plan.n_propeller(),
        plan.n_body(),
        noise.noise_power()
    );
    for (index, waveform) in batch.enumerate() {
        let peak = waveform.amplitudes().iter().fold(0.0f64, |m, a| m.max(a.abs()));
        println!(
            "#{:<2} {:?} start {:.6e}s duration {:.3e}s peak {:.4}",
            index,
            plan.kind_at(index),
            waveform.times()[0],
            waveform.duration(),
            peak
        );
    }
    Ok(())
}
