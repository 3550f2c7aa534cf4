// src/processing/filters/mod.rs
//! Band-limiting filter design and zero-phase application.

pub mod butterworth;
pub mod zero_phase;

pub use butterworth::design_bandpass;
pub use zero_phase::filtfilt;

use num_complex::Complex;
use std::f64::consts::PI;

/// A second-order section (biquad).
///
/// Transfer function: `H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)`
#[derive(Debug, Clone, PartialEq)]
pub struct Sos {
    pub(crate) b0: f64,
    pub(crate) b1: f64,
    pub(crate) b2: f64,
    pub(crate) a1: f64,
    pub(crate) a2: f64,
}

impl Sos {
    /// Apply this section to a buffer using Direct Form II Transposed,
    /// returning the output and the final delay-line state.
    pub(crate) fn filter(&self, data: &[f64], zi: Option<[f64; 2]>) -> (Vec<f64>, [f64; 2]) {
        let mut output = Vec::with_capacity(data.len());

        let mut z1 = zi.map(|z| z[0]).unwrap_or(0.0);
        let mut z2 = zi.map(|z| z[1]).unwrap_or(0.0);

        for &x in data {
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            output.push(y);
        }

        (output, [z1, z2])
    }

    /// Steady-state delay-line contents for a step input of value `x0`,
    /// equivalent to scipy's `lfilter_zi` scaled by the edge sample.
    pub(crate) fn compute_zi(&self, x0: f64) -> [f64; 2] {
        // At steady state with x[n] = y[n] = x0:
        //   z2 = (b2 - a2) * x0
        //   z1 = (b1 - a1 + b2 - a2) * x0
        let z2 = (self.b2 - self.a2) * x0;
        let z1 = (self.b1 - self.a1) * x0 + z2;
        [z1, z2]
    }
}

/// Coefficients of a designed band-pass filter, realised as a cascade of
/// second-order sections. Immutable once designed; the applier borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    pub(crate) sections: Vec<Sos>,
}

impl FilterCoefficients {
    /// Number of cascaded biquad sections.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Smallest buffer length [`filtfilt`] accepts for these coefficients.
    /// Anything shorter cannot be edge-padded for the forward-backward pass.
    pub fn min_samples(&self) -> usize {
        zero_phase::pad_len(self) + 1
    }

    /// Magnitude response of the cascade at `freq_hz` for a signal sampled
    /// at `sample_rate_hz`.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / sample_rate_hz;
        let z = Complex::from_polar(1.0, omega);

        let mut mag = 1.0;
        for s in &self.sections {
            let num = s.b0 * z * z + s.b1 * z + s.b2;
            let den = z * z + s.a1 * z + s.a2;
            mag *= (num / den).norm();
        }
        mag
    }
}
