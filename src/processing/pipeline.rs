// src/processing/pipeline.rs
//! The conditioning and detection pipeline facade.
//!
//! Stages run in strict sequence over one buffer: DC-offset removal,
//! zero-phase band-pass, envelope extraction, threshold estimation, event
//! detection. The whole pipeline is synchronous and single-threaded; live
//! acquisition decouples from it through `acquisition::SampleQueue`.

use crate::config::{validate_pipeline_config, PipelineConfig};
use crate::error::PipelineError;
use crate::processing::detector::{DetectionSummary, FlexionDetector};
use crate::processing::envelope::extract_envelope;
use crate::processing::filters::{design_bandpass, filtfilt, FilterCoefficients};
use crate::processing::threshold::Threshold;
use crate::processing::window::WindowController;
use tracing::debug;

/// A conditioned signal: the zero-phase filtered waveform for display and
/// the envelope the detector scans. Both match the input length. Derived
/// artifacts, never edited in place.
#[derive(Debug, Clone)]
pub struct ConditionedSignal {
    /// Band-passed, zero-phase filtered signal.
    pub filtered: Vec<f64>,
    /// Rectified and smoothed detection envelope.
    pub envelope: Vec<f64>,
}

/// Detection pipeline for one signal source.
///
/// The filter is designed once at construction, so an invalid filter
/// configuration is surfaced before any samples are processed. The pipeline itself holds no
/// per-run mutable state; every batch call and every controller gets its
/// own detector instance.
pub struct FlexionPipeline {
    config: PipelineConfig,
    coefficients: FilterCoefficients,
}

impl FlexionPipeline {
    /// Validate the configuration and design the band-pass filter.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        validate_pipeline_config(&config)
            .map_err(|reason| PipelineError::InvalidFilterSpec { reason })?;

        let coefficients = design_bandpass(
            config.low_cutoff_hz,
            config.high_cutoff_hz,
            config.filter_order,
            config.sample_rate_hz,
        )?;
        debug!(
            sections = coefficients.num_sections(),
            low = config.low_cutoff_hz,
            high = config.high_cutoff_hz,
            "band-pass filter designed"
        );

        Ok(Self {
            config,
            coefficients,
        })
    }

    /// The designed filter coefficients.
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    /// The configuration this pipeline was built from.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Condition a raw buffer: reject malformed samples, remove the DC
    /// offset, band-pass with zero phase and extract the envelope.
    pub fn condition(&self, samples: &[f64]) -> Result<ConditionedSignal, PipelineError> {
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::MalformedSample {
                index,
                value: samples[index],
            });
        }

        let unbiased = remove_dc_offset(samples);
        let filtered = filtfilt(&self.coefficients, &unbiased)?;
        let envelope = extract_envelope(&filtered, self.config.smoothing_window_samples);
        debug!(samples = samples.len(), "signal conditioned");

        Ok(ConditionedSignal { filtered, envelope })
    }

    /// One-shot batch detection over a finite buffer.
    ///
    /// The threshold is estimated once over the full envelope. Errors are
    /// fatal here; frame-level skipping only applies to windowed runs.
    pub fn detect(&self, samples: &[f64]) -> Result<DetectionSummary, PipelineError> {
        let conditioned = self.condition(samples)?;
        let threshold = Threshold::estimate(&conditioned.envelope, self.config.threshold_fraction);

        let mut detector = self.detector();
        detector.scan(&conditioned.envelope, 0, threshold.value);
        debug!(
            events = detector.event_count(),
            threshold = threshold.value,
            "batch detection complete"
        );

        Ok(DetectionSummary::from_events(detector.events()))
    }

    /// Build a window controller for progressive (live-display) detection
    /// over a pre-recorded or fully buffered signal.
    pub fn controller(&self, samples: &[f64]) -> Result<WindowController, PipelineError> {
        let conditioned = self.condition(samples)?;
        Ok(WindowController::new(
            conditioned.filtered,
            conditioned.envelope,
            self.detector(),
            self.config.sample_rate_hz,
            self.config.threshold_fraction,
            self.config.window.frame_samples,
            self.config.window.frame_step,
        ))
    }

    /// A fresh detector configured for this pipeline. Each detection run
    /// owns its instance; refractory state is never shared between runs.
    pub fn detector(&self) -> FlexionDetector {
        FlexionDetector::new(
            self.config.sample_rate_hz,
            self.config.refractory_period_seconds,
        )
    }
}

/// Subtract the buffer mean, removing amplifier bias before filtering.
pub fn remove_dc_offset(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|x| x - mean).collect()
}
