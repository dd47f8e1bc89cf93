//! Truncated path signatures
//!
//! The signature of a path `X: [0, T] → R^d` is the sequence of its iterated
//! integrals. Truncated at level `L` it lives in the tensor algebra
//! `R ⊕ R^d ⊕ (R^d)^⊗2 ⊕ … ⊕ (R^d)^⊗L` and has
//! `1 + d + d² + … + d^L` coefficients.
//!
//! ## Computation
//!
//! A stream is treated as the piecewise linear path through its rows. The
//! signature of one linear segment with increment `Δ` is the truncated tensor
//! exponential `exp(Δ) = Σ Δ^⊗k / k!`, and Chen's identity multiplies segment
//! signatures together:
//!
//! ```text
//! S(X₀…Xₙ) = exp(Δ₁) ⊗ exp(Δ₂) ⊗ … ⊗ exp(Δₙ)
//! ```
//!
//! The product is done in place, highest level first, so each step costs
//! `O(L·d^L)` and needs no scratch copy of the running signature.
//!
//! ## Layout
//!
//! Coefficients are ordered by level, then lexicographically by word:
//! `() (1) (2) … (d) (1,1) (1,2) … (d,d) (1,1,1) …`, with letters numbered
//! from 1 as in [`signature_keys`].

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::constants::MAX_SIGNATURE_COEFFICIENTS;
use crate::errors::SignatureError;
use crate::leadlag::PathStream;
use crate::traits::SignatureBackend;

/// Number of coefficients up to `truncation_level` for `width` channels
///
/// Counts the level-0 scalar, so `signature_dimension(2, 2) == 7`.
/// Saturates at `usize::MAX`; see [`try_signature_dimension`].
pub fn signature_dimension(width: usize, truncation_level: usize) -> usize {
    try_signature_dimension(width, truncation_level).unwrap_or(usize::MAX)
}

/// Number of coefficients, or `None` if it overflows `usize`
pub fn try_signature_dimension(width: usize, truncation_level: usize) -> Option<usize> {
    match width {
        0 => return Some(1),
        1 => return truncation_level.checked_add(1),
        _ => {}
    }
    let mut total = 0usize;
    let mut words = 1usize;
    for level in 0..=truncation_level {
        total = total.checked_add(words)?;
        if level < truncation_level {
            words = words.checked_mul(width)?;
        }
    }
    Some(total)
}

/// Number of coefficients, rejecting sizes above [`MAX_SIGNATURE_COEFFICIENTS`]
///
/// ```rust
/// use dronesig_core::signature::checked_signature_dimension;
///
/// assert_eq!(checked_signature_dimension(3, 3), Ok(40));
/// assert!(checked_signature_dimension(3, 64).is_err());
/// ```
pub fn checked_signature_dimension(
    width: usize,
    truncation_level: usize,
) -> Result<usize, SignatureError> {
    if truncation_level >= MAX_SIGNATURE_COEFFICIENTS {
        return Err(SignatureError::SignatureTooLarge {
            width,
            truncation_level,
        });
    }
    try_signature_dimension(width, truncation_level)
        .filter(|&dimension| dimension <= MAX_SIGNATURE_COEFFICIENTS)
        .ok_or(SignatureError::SignatureTooLarge {
            width,
            truncation_level,
        })
}

/// [`signature_keys`] for sizes within [`MAX_SIGNATURE_COEFFICIENTS`]
pub fn try_signature_keys(width: usize, truncation_level: usize) -> Result<String, SignatureError> {
    checked_signature_dimension(width, truncation_level)?;
    Ok(signature_keys(width, truncation_level))
}

/// Space-separated word labels in coefficient order
///
/// ```rust
/// assert_eq!(
///     dronesig_core::signature_keys(2, 2),
///     "() (1) (2) (1,1) (1,2) (2,1) (2,2)"
/// );
/// ```
pub fn signature_keys(width: usize, truncation_level: usize) -> String {
    let mut keys = String::from("()");
    let mut word: Vec<usize> = Vec::with_capacity(truncation_level);

    for level in 1..=truncation_level {
        if width == 0 {
            break;
        }
        word.clear();
        word.resize(level, 0);
        loop {
            keys.push_str(" (");
            for (position, letter) in word.iter().enumerate() {
                if position > 0 {
                    keys.push(',');
                }
                let _ = write!(keys, "{}", letter + 1);
            }
            keys.push(')');

            // Odometer increment over the alphabet
            let mut exhausted = true;
            for position in (0..level).rev() {
                word[position] += 1;
                if word[position] < width {
                    exhausted = false;
                    break;
                }
                word[position] = 0;
            }
            if exhausted {
                break;
            }
        }
    }
    keys
}

/// Signature coefficients of one stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureVector {
    values: Vec<f64>,
    width: usize,
    truncation_level: usize,
}

impl SignatureVector {
    /// Wrap coefficients laid out for `width` channels up to `truncation_level`
    ///
    /// Returns `None` if the length does not match that layout.
    pub fn new(values: Vec<f64>, width: usize, truncation_level: usize) -> Option<Self> {
        if values.len() != signature_dimension(width, truncation_level) {
            return None;
        }
        Some(Self {
            values,
            width,
            truncation_level,
        })
    }

    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: the level-0 term is present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Channels of the stream the signature was taken of
    pub fn width(&self) -> usize {
        self.width
    }

    /// Highest level retained
    pub fn truncation_level(&self) -> usize {
        self.truncation_level
    }

    /// All coefficients
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Coefficients of level `k` (`width^k` values)
    pub fn level(&self, k: usize) -> Option<&[f64]> {
        if k > self.truncation_level {
            return None;
        }
        let start = match k {
            0 => 0,
            _ => try_signature_dimension(self.width, k - 1)?,
        };
        let end = try_signature_dimension(self.width, k)?;
        self.values.get(start..end)
    }

    /// Take the coefficients
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Built-in backend: Chen's identity over the truncated tensor algebra
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorSignature;

impl TensorSignature {
    /// Create the backend
    pub fn new() -> Self {
        Self
    }
}

impl SignatureBackend for TensorSignature {
    fn compute_signature(
        &self,
        stream: &PathStream,
        truncation_level: usize,
    ) -> Result<SignatureVector, SignatureError> {
        check_stream(stream, truncation_level)?;

        let width = stream.width();
        let layout = TensorLayout::new(width, truncation_level);
        let mut signature = vec![0.0; layout.dimension()];
        signature[0] = 1.0;
        let mut segment = vec![0.0; layout.dimension()];
        let mut increment = vec![0.0; width];

        let mut rows = stream.rows();
        let mut previous = match rows.next() {
            Some(row) => row,
            None => return Err(SignatureError::TooFewRows { rows: 0 }),
        };
        for row in rows {
            for ((delta, &next), &prev) in increment.iter_mut().zip(row).zip(previous) {
                *delta = next - prev;
            }
            layout.exponential(&increment, &mut segment);
            layout.multiply_in_place(&mut signature, &segment);
            previous = row;
        }

        Ok(SignatureVector {
            values: signature,
            width,
            truncation_level,
        })
    }
}

fn check_stream(stream: &PathStream, truncation_level: usize) -> Result<(), SignatureError> {
    if truncation_level == 0 {
        return Err(SignatureError::ZeroTruncationLevel);
    }
    checked_signature_dimension(stream.width(), truncation_level)?;
    if stream.len() < 2 {
        return Err(SignatureError::TooFewRows { rows: stream.len() });
    }
    for (row, values) in stream.rows().enumerate() {
        if let Some(column) = values.iter().position(|value| !value.is_finite()) {
            return Err(SignatureError::NonFiniteValue { row, column });
        }
    }
    Ok(())
}

/// Offsets of each level inside a flat truncated tensor
struct TensorLayout {
    width: usize,
    level: usize,
    /// `offsets[k]` is where level `k` starts; `offsets[level + 1]` is the total size
    offsets: Vec<usize>,
}

impl TensorLayout {
    fn new(width: usize, level: usize) -> Self {
        let mut offsets = Vec::with_capacity(level + 2);
        let mut start = 0;
        let mut words = 1;
        for _ in 0..=level {
            offsets.push(start);
            start += words;
            words *= width;
        }
        offsets.push(start);
        Self {
            width,
            level,
            offsets,
        }
    }

    fn dimension(&self) -> usize {
        self.offsets[self.level + 1]
    }

    fn range(&self, k: usize) -> core::ops::Range<usize> {
        self.offsets[k]..self.offsets[k + 1]
    }

    /// `out ← exp(Δ)`: level k is `Δ^⊗k / k!`
    fn exponential(&self, increment: &[f64], out: &mut [f64]) {
        out[0] = 1.0;
        out[self.range(1)].copy_from_slice(increment);
        for k in 2..=self.level {
            let (lower, upper) = out.split_at_mut(self.offsets[k]);
            let previous = &lower[self.range(k - 1)];
            let current = &mut upper[..self.offsets[k + 1] - self.offsets[k]];
            let scale = 1.0 / k as f64;
            for (prefix, &p) in previous.iter().enumerate() {
                let base = prefix * self.width;
                for (letter, &delta) in increment.iter().enumerate() {
                    current[base + letter] = p * delta * scale;
                }
            }
        }
    }

    /// `signature ← signature ⊗ segment`, both with a unit level-0 term
    ///
    /// Levels are updated from the top down so every lower level read is
    /// still the old value.
    fn multiply_in_place(&self, signature: &mut [f64], segment: &[f64]) {
        for k in (1..=self.level).rev() {
            let (lower, upper) = signature.split_at_mut(self.offsets[k]);
            let target = &mut upper[..self.offsets[k + 1] - self.offsets[k]];

            // Level-0 of the running signature is 1: plain addition of segment level k
            for (t, &s) in target.iter_mut().zip(&segment[self.range(k)]) {
                *t += s;
            }

            for j in 1..k {
                let left = &lower[self.range(k - j)];
                let right = &segment[self.range(j)];
                let stride = right.len();
                for (prefix, &l) in left.iter().enumerate() {
                    if l == 0.0 {
                        continue;
                    }
                    let block = &mut target[prefix * stride..(prefix + 1) * stride];
                    for (t, &r) in block.iter_mut().zip(right) {
                        *t += l * r;
                    }
                }
            }
        }
    }
}
