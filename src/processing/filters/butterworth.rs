// src/processing/filters/butterworth.rs
//! Band-pass Butterworth design.
//!
//! The design path is the classical one: analog prototype poles on the unit
//! circle, low-pass to band-pass transformation, bilinear transform into the
//! z-plane, conjugate poles paired into biquad sections, passband gain
//! normalised to 1.0 at the geometric centre frequency. An order-N request
//! yields a 2N-pole filter (N biquads), matching
//! `scipy.signal.butter(N, [low, high], btype='band')`.

use super::{FilterCoefficients, Sos};
use crate::error::PipelineError;
use num_complex::Complex;
use std::f64::consts::PI;

/// Design a band-pass Butterworth filter.
///
/// Cutoffs are normalised against the Nyquist frequency internally; both
/// must lie strictly inside (0, Nyquist) with `low < high`. Pure function
/// of its inputs: identical arguments yield bit-identical coefficients.
pub fn design_bandpass(
    low_cutoff_hz: f64,
    high_cutoff_hz: f64,
    order: usize,
    sample_rate_hz: f64,
) -> Result<FilterCoefficients, PipelineError> {
    validate_spec(low_cutoff_hz, high_cutoff_hz, order, sample_rate_hz)?;

    let nyquist = sample_rate_hz / 2.0;
    let low = low_cutoff_hz / nyquist;
    let high = high_cutoff_hz / nyquist;

    // Pre-warp the band edges for the bilinear transform
    let u_low = (PI * low / 2.0).tan();
    let u_high = (PI * high / 2.0).tan();
    let bw = u_high - u_low;
    let center_sq = u_low * u_high;

    // Butterworth prototype poles, all in the left half-plane:
    // exp(j * pi * (2k + order + 1) / (2 * order)), k = 0..order-1
    let prototype: Vec<Complex<f64>> = (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex::from_polar(1.0, theta)
        })
        .collect();

    // Low-pass to band-pass: s -> (s^2 + center_sq) / (s * bw), so each
    // prototype pole p contributes the two roots of
    // s^2 - (p * bw) * s + center_sq = 0.
    let mut analog_poles = Vec::with_capacity(order * 2);
    for p in prototype {
        let b_val = -p * bw;
        let disc = (b_val * b_val - 4.0 * center_sq).sqrt();
        analog_poles.push((-b_val + disc) / 2.0);
        analog_poles.push((-b_val - disc) / 2.0);
    }

    // Bilinear transform into the z-plane
    let z_poles: Vec<Complex<f64>> = analog_poles
        .iter()
        .map(|&s| (1.0 + s) / (1.0 - s))
        .collect();

    // The band-pass has `order` zeros at z = +1 and `order` at z = -1, so
    // every biquad numerator is (z - 1)(z + 1) = z^2 - 1. Pair each pole
    // with its conjugate so the denominators stay real.
    let mut sections = Vec::with_capacity(order);
    let mut used = vec![false; z_poles.len()];
    for i in 0..z_poles.len() {
        if used[i] {
            continue;
        }

        let mut mate = i;
        let mut min_err = f64::INFINITY;
        for j in (i + 1)..z_poles.len() {
            if used[j] {
                continue;
            }
            let err = (z_poles[i].re - z_poles[j].re).abs() + (z_poles[i].im + z_poles[j].im).abs();
            if err < min_err {
                min_err = err;
                mate = j;
            }
        }

        used[i] = true;
        used[mate] = true;

        let (p1, p2) = (z_poles[i], z_poles[mate]);
        sections.push(Sos {
            b0: 1.0,
            b1: 0.0,
            b2: -1.0,
            a1: -(p1 + p2).re,
            a2: (p1 * p2).re,
        });
    }

    let mut coefficients = FilterCoefficients { sections };

    // Normalise so the passband peaks at unity gain, with the correction
    // spread evenly across sections to keep intermediate stages bounded.
    let center_hz = (low_cutoff_hz * high_cutoff_hz).sqrt();
    let mag = coefficients.magnitude_at(center_hz, sample_rate_hz);
    let section_gain = (1.0 / mag).powf(1.0 / coefficients.sections.len() as f64);
    for s in &mut coefficients.sections {
        s.b0 *= section_gain;
        s.b1 *= section_gain;
        s.b2 *= section_gain;
    }

    Ok(coefficients)
}

fn validate_spec(
    low_cutoff_hz: f64,
    high_cutoff_hz: f64,
    order: usize,
    sample_rate_hz: f64,
) -> Result<(), PipelineError> {
    let invalid = |reason: &str| PipelineError::InvalidFilterSpec {
        reason: reason.to_string(),
    };

    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(invalid("sample rate must be positive"));
    }
    if !low_cutoff_hz.is_finite() || low_cutoff_hz <= 0.0 {
        return Err(invalid("low cutoff must be positive"));
    }
    if !high_cutoff_hz.is_finite() || high_cutoff_hz <= low_cutoff_hz {
        return Err(invalid("high cutoff must be above the low cutoff"));
    }
    if high_cutoff_hz >= sample_rate_hz / 2.0 {
        return Err(invalid("high cutoff must be below the Nyquist frequency"));
    }
    if order == 0 || order > 8 {
        return Err(invalid("order must be 1-8"));
    }

    Ok(())
}
