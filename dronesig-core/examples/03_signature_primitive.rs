//! The path-signature primitive on a hand-written stream
//!
//! Run with: cargo run -p dronesig-core --example 03_signature_primitive

use dronesig_core::{signature_keys, PathStream, SignatureBackend, TensorSignature};

fn main() -> Result<(), dronesig_core::SignatureError> {
    // Unit square traversed right then up
    let stream = PathStream::from_rows(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]])?;
    let signature = TensorSignature.compute_signature(&stream, 3)?;

    for (key, value) in signature_keys(2, 3).split(' ').zip(signature.as_slice()) {
        println!("{:>9} {:+.6}", key, value);
    }

    let level_two = signature.level(2).unwrap_or_default();
    println!("Levy area: {:+.3}", 0.5 * (level_two[1] - level_two[2]));
    Ok(())
}
