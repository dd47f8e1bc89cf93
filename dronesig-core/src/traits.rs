//! Extension points
//!
//! The estimator treats the path-signature computation as a black-box
//! numerical primitive behind [`SignatureBackend`]. [`TensorSignature`] is the
//! built-in implementation; any other backend only has to honour the length
//! contract: the output length depends on the stream width and truncation
//! level alone.
//!
//! [`TensorSignature`]: crate::signature::TensorSignature

use crate::errors::SignatureError;
use crate::leadlag::PathStream;
use crate::signature::{signature_dimension, SignatureVector};

/// Truncated path-signature primitive
///
/// Backends are shared across worker threads, hence `Send + Sync`.
pub trait SignatureBackend: Send + Sync {
    /// Signature of `stream` up to `truncation_level`
    fn compute_signature(
        &self,
        stream: &PathStream,
        truncation_level: usize,
    ) -> Result<SignatureVector, SignatureError>;

    /// Output length for a stream of `width` channels
    fn signature_length(&self, width: usize, truncation_level: usize) -> usize {
        signature_dimension(width, truncation_level)
    }
}

impl<B: SignatureBackend + ?Sized> SignatureBackend for &B {
    fn compute_signature(
        &self,
        stream: &PathStream,
        truncation_level: usize,
    ) -> Result<SignatureVector, SignatureError> {
        (**self).compute_signature(stream, truncation_level)
    }

    fn signature_length(&self, width: usize, truncation_level: usize) -> usize {
        (**self).signature_length(width, truncation_level)
    }
}
