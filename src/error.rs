// src/error.rs
//! Error types shared across the detection pipeline.

use thiserror::Error;

/// Errors produced by the signal conditioning and detection stages.
///
/// Construction-time errors (`InvalidFilterSpec`) are never retried: the
/// caller fixes the configuration and rebuilds the pipeline. Per-frame
/// errors (`InsufficientSamples`, `MalformedSample`) are fatal for a
/// one-shot batch run but recoverable at the window-controller level,
/// which skips the offending frame and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Cutoff frequencies or filter order violate the design constraints.
    #[error("invalid filter spec: {reason}")]
    InvalidFilterSpec {
        /// Which constraint was violated.
        reason: String,
    },

    /// The buffer is too short for the configured filter order.
    #[error("insufficient samples: need more than {required}, got {actual}")]
    InsufficientSamples {
        /// Minimum number of samples the current filter requires.
        required: usize,
        /// Number of samples actually supplied.
        actual: usize,
    },

    /// A non-finite sample reached the pipeline. The acquisition boundary
    /// is supposed to never deliver one; the pipeline rejects the buffer
    /// rather than letting NaN corrupt the envelope and threshold state.
    #[error("malformed sample at index {index}: {value}")]
    MalformedSample {
        /// Position of the offending sample in its buffer.
        index: usize,
        /// The offending value.
        value: f64,
    },
}
