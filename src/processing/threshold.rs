// src/processing/threshold.rs
//! Detection threshold derived from the envelope peak.

/// An immutable threshold estimate. Re-estimation produces a new value;
/// nothing mutates an existing one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    /// Absolute detection level in envelope units.
    pub value: f64,
    /// Fraction of the envelope peak this was derived from.
    pub fraction: f64,
}

impl Threshold {
    /// Estimate a threshold as `fraction` of the envelope peak over the
    /// analysis window. An empty or all-zero envelope yields 0.0; combined
    /// with the detector's strict comparison that means nothing fires on a
    /// flat-zero envelope, while any strictly positive envelope over a zero
    /// threshold degenerates to refractory-limited firing.
    pub fn estimate(envelope: &[f64], fraction: f64) -> Self {
        let peak = envelope.iter().copied().fold(0.0_f64, f64::max);
        Self {
            value: fraction * peak,
            fraction,
        }
    }
}
