//! Streams and the partial lead-lag transform
//!
//! The incident and reflected waveforms are combined into a two-channel
//! path. The partial lead-lag transform doubles every row and lets a third
//! "lag" channel trail the reflected channel by one row, so the signature
//! of the path also sees the quadratic variation of the reflection.
//!
//! ```text
//! rows in:   (x0, y0) (x1, y1) (x2, y2)
//! rows out:  (x0, y0, y0) (x1, y1, y0) (x1, y1, y1) (x2, y2, y1) (x2, y2, y2)
//! ```

use alloc::vec::Vec;
use core::slice::ChunksExact;

use crate::errors::{EstimatorError, EstimatorResult, SignatureError};
use crate::signal::Waveform;

/// Row-major multi-channel path
#[derive(Debug, Clone, PartialEq)]
pub struct PathStream {
    width: usize,
    data: Vec<f64>,
}

impl PathStream {
    /// Wrap row-major `data` of `width` channels
    pub fn new(width: usize, data: Vec<f64>) -> Result<Self, SignatureError> {
        if width == 0 {
            return Err(SignatureError::ZeroWidth);
        }
        if data.len() % width != 0 {
            return Err(SignatureError::RaggedStream {
                row: data.len() / width,
                expected: width,
                found: data.len() % width,
            });
        }
        Ok(Self { width, data })
    }

    /// Build from rows, rejecting rows of differing width
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, SignatureError> {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(SignatureError::ZeroWidth);
        }
        let mut data = Vec::with_capacity(width * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(SignatureError::RaggedStream {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { width, data })
    }

    /// Interleave equal-length columns into rows
    pub fn from_columns(columns: &[&[f64]]) -> EstimatorResult<Self> {
        let width = columns.len();
        if width == 0 {
            return Err(SignatureError::ZeroWidth.into());
        }
        let len = columns[0].len();
        if let Some(mismatched) = columns.iter().find(|column| column.len() != len) {
            return Err(EstimatorError::MismatchedWaveforms {
                incident: len,
                reflected: mismatched.len(),
            });
        }

        let mut data = Vec::with_capacity(width * len);
        for row in 0..len {
            data.extend(columns.iter().map(|column| column[row]));
        }
        Ok(Self { width, data })
    }

    /// Channels per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    /// True when the stream has no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `index`
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.width)?;
        self.data.get(start..start + self.width)
    }

    /// Iterate rows in order
    pub fn rows(&self) -> ChunksExact<'_, f64> {
        self.data.chunks_exact(self.width)
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// How a waveform pair becomes a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamTransform {
    /// Two channels `(incident, reflected)`, one row per sample
    Identity,
    /// Three channels `(incident, reflected, lagged reflected)`, `2M − 1` rows
    #[default]
    PartialLeadLag,
}

impl StreamTransform {
    /// Pick the transform from a flag
    pub fn from_flag(use_lead_lag: bool) -> Self {
        if use_lead_lag {
            Self::PartialLeadLag
        } else {
            Self::Identity
        }
    }

    /// Channels of the produced stream
    pub fn output_width(&self) -> usize {
        match self {
            Self::Identity => 2,
            Self::PartialLeadLag => 3,
        }
    }

    /// Rows produced from `samples` input rows
    pub fn output_len(&self, samples: usize) -> usize {
        match self {
            Self::Identity => samples,
            Self::PartialLeadLag => (2 * samples).saturating_sub(1),
        }
    }

    /// Combine two equal-length channels into a stream
    pub fn apply(&self, incident: &[f64], reflected: &[f64]) -> EstimatorResult<PathStream> {
        if incident.len() != reflected.len() {
            return Err(EstimatorError::MismatchedWaveforms {
                incident: incident.len(),
                reflected: reflected.len(),
            });
        }
        match self {
            Self::Identity => PathStream::from_columns(&[incident, reflected]),
            Self::PartialLeadLag => Ok(partial_lead_lag(incident, reflected)),
        }
    }

    /// Combine an incident and a reflected waveform
    pub fn build_stream(
        &self,
        incident: &Waveform,
        reflected: &Waveform,
    ) -> EstimatorResult<PathStream> {
        self.apply(incident.amplitudes(), reflected.amplitudes())
    }
}

/// Row `j` of the output is `(x[(j+1)/2], y[(j+1)/2], y[j/2])`
fn partial_lead_lag(incident: &[f64], reflected: &[f64]) -> PathStream {
    let rows = (2 * incident.len()).saturating_sub(1);
    let mut data = Vec::with_capacity(3 * rows);
    for j in 0..rows {
        let lead = (j + 1) / 2;
        let lag = j / 2;
        data.extend_from_slice(&[incident[lead], reflected[lead], reflected[lag]]);
    }
    PathStream { width: 3, data }
}
