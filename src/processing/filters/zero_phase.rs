// src/processing/filters/zero_phase.rs
//! Forward-backward (zero-phase) filtering.
//!
//! Runs the section cascade once forward and once over the time-reversed
//! signal so the phase responses cancel and peak timing in the output lines
//! up with the input. Both ends are reflect-padded and each section starts
//! from its steady-state delay-line contents, which keeps the edge
//! transients out of the returned slice.

use super::FilterCoefficients;
use crate::error::PipelineError;

/// Reflection padding applied at each end of the buffer, and therefore the
/// lower bound (exclusive) on the buffer length.
pub(crate) fn pad_len(coefficients: &FilterCoefficients) -> usize {
    3 * coefficients.sections.len() * 2
}

/// Apply `coefficients` to `data` with zero net phase shift.
///
/// The output has the same length as the input. Amplitude is not
/// renormalised; downstream stages must not assume a fixed scale.
pub fn filtfilt(coefficients: &FilterCoefficients, data: &[f64]) -> Result<Vec<f64>, PipelineError> {
    let pad = pad_len(coefficients);
    if data.len() <= pad {
        return Err(PipelineError::InsufficientSamples {
            required: pad,
            actual: data.len(),
        });
    }

    let padded = reflect_pad(data, pad);

    // Forward pass
    let mut forward = padded;
    for s in &coefficients.sections {
        let zi = s.compute_zi(forward[0]);
        let (filtered, _) = s.filter(&forward, Some(zi));
        forward = filtered;
    }

    // Backward pass over the reversed signal
    forward.reverse();
    let mut backward = forward;
    for s in &coefficients.sections {
        let zi = s.compute_zi(backward[0]);
        let (filtered, _) = s.filter(&backward, Some(zi));
        backward = filtered;
    }
    backward.reverse();

    Ok(backward[pad..pad + data.len()].to_vec())
}

/// Pad the buffer at both ends with values mirrored about the edge samples.
fn reflect_pad(data: &[f64], pad: usize) -> Vec<f64> {
    let n = data.len();
    let pad = pad.min(n - 1);

    let mut padded = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        padded.push(2.0 * data[0] - data[i]);
    }
    padded.extend_from_slice(data);
    for i in 1..=pad {
        padded.push(2.0 * data[n - 1] - data[n - 1 - i]);
    }

    padded
}
