//! Parallel reflection processing
//!
//! Reflections are simulated and reduced to signatures on the rayon pool.
//! Every reflection owns its random stream (see [`crate::reflection`]), and
//! signatures are gathered back in index order before being summed, so the
//! result equals the sequential estimate exactly.

use rayon::prelude::*;

use crate::errors::EstimatorResult;
use crate::estimator::{signature_for_reflection, ExpectedSignature, SignatureAccumulator};
use crate::leadlag::StreamTransform;
use crate::reflection::{ReflectionPlan, ReflectionSimulator};
use crate::signal::Waveform;
use crate::signature::{checked_signature_dimension, SignatureVector};
use crate::traits::SignatureBackend;

/// Mean signature of `plan`, one rayon task per reflection
pub fn estimate_expected_signature_parallel<B: SignatureBackend + ?Sized>(
    incident: &Waveform,
    simulator: &ReflectionSimulator,
    plan: &ReflectionPlan,
    truncation_level: usize,
    transform: StreamTransform,
    backend: &B,
) -> EstimatorResult<ExpectedSignature> {
    let width = transform.output_width();
    checked_signature_dimension(width, truncation_level)?;

    let signatures: Vec<SignatureVector> = (0..plan.len())
        .into_par_iter()
        .map(|index| {
            let reflected = simulator.reflection_at(plan, index);
            signature_for_reflection(backend, transform, incident, &reflected, truncation_level)
        })
        .collect::<EstimatorResult<_>>()?;

    let mut accumulator =
        SignatureAccumulator::new(backend.signature_length(width, truncation_level));
    for signature in &signatures {
        accumulator.add(signature.as_slice())?;
    }

    log_debug!("Reduced {} reflections in parallel", accumulator.count());

    let n_reflections = accumulator.count();
    Ok(ExpectedSignature {
        values: accumulator.finish()?,
        n_reflections,
        truncation_level,
        stream_width: width,
    })
}

/// Materialize the reflections of `plan` on the rayon pool, in index order
pub fn simulate_batch_parallel(
    simulator: &ReflectionSimulator,
    plan: &ReflectionPlan,
) -> Vec<Waveform> {
    (0..plan.len())
        .into_par_iter()
        .map(|index| simulator.reflection_at(plan, index))
        .collect()
}
