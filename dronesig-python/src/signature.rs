//! Path-signature primitive exposed to Python

use dronesig_core::{
    checked_signature_dimension, try_signature_dimension, try_signature_keys, PathStream,
    SignatureBackend, TensorSignature,
};
use pyo3::prelude::*;

use crate::errors::{BindingError, BindingResult};

fn stream_signature(stream: &[Vec<f64>], depth: usize) -> BindingResult<Vec<f64>> {
    if depth == 0 {
        return Err(BindingError::InvalidArgument {
            parameter: "depth",
            reason: "must be at least 1".to_owned(),
        });
    }
    let stream = PathStream::from_rows(stream)?;
    checked_signature_dimension(stream.width(), depth)?;
    Ok(TensorSignature.compute_signature(&stream, depth)?.into_vec())
}

/// Truncated signature of a stream given as a list of rows
///
/// The result includes the leading level-0 term `1.0` and is ordered by
/// level, then lexicographically by word.
#[pyfunction]
pub fn stream2sig(py: Python<'_>, stream: Vec<Vec<f64>>, depth: usize) -> PyResult<Vec<f64>> {
    Ok(py.allow_threads(|| stream_signature(&stream, depth))?)
}

/// Length of a signature of `width` channels truncated at `depth`
#[pyfunction]
pub fn sigdim(width: usize, depth: usize) -> PyResult<usize> {
    try_signature_dimension(width, depth)
        .ok_or(BindingError::InvalidArgument {
            parameter: "depth",
            reason: format!("signature of width {} at depth {} overflows", width, depth),
        })
        .map_err(PyErr::from)
}

/// Space-separated words labelling each signature coefficient
#[pyfunction]
pub fn sigkeys(width: usize, depth: usize) -> PyResult<String> {
    Ok(try_signature_keys(width, depth).map_err(BindingError::from)?)
}
