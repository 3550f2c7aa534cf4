// src/config/pipeline_config.rs
//! Signal conditioning and detection configuration structures

use serde::{Deserialize, Serialize};

/// Complete detection pipeline configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineConfig {
    /// Lower band-pass cutoff in Hz
    pub low_cutoff_hz: f64,
    /// Upper band-pass cutoff in Hz
    pub high_cutoff_hz: f64,
    /// Butterworth filter order (1-8)
    pub filter_order: usize,
    /// Sampling rate of the incoming signal in Hz
    pub sample_rate_hz: f64,
    /// Moving-average window for envelope smoothing, in samples
    pub smoothing_window_samples: usize,
    /// Detection threshold as a fraction of the envelope peak
    pub threshold_fraction: f64,
    /// Minimum spacing between accepted events, in seconds
    pub refractory_period_seconds: f64,
    /// Frame geometry for windowed (live-display) operation
    pub window: WindowConfig,
}

/// Frame geometry for the window controller
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WindowConfig {
    /// Number of samples visible per frame
    pub frame_samples: usize,
    /// Samples the frame advances per step
    pub frame_step: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_cutoff_hz: 20.0,
            high_cutoff_hz: 450.0,
            filter_order: 4,
            sample_rate_hz: 1000.0,
            smoothing_window_samples: 50,
            threshold_fraction: 0.5,
            refractory_period_seconds: 0.5,
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            frame_samples: 200,
            frame_step: 1,
        }
    }
}

impl PipelineConfig {
    /// Refractory period expressed in samples at the configured rate.
    pub fn refractory_samples(&self) -> usize {
        (self.sample_rate_hz * self.refractory_period_seconds).round() as usize
    }
}

/// Validate a pipeline configuration
pub fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), String> {
    if !config.sample_rate_hz.is_finite() || config.sample_rate_hz <= 0.0 {
        return Err("Sample rate must be positive".to_string());
    }
    if config.low_cutoff_hz <= 0.0 {
        return Err("Low cutoff frequency must be positive".to_string());
    }
    if config.high_cutoff_hz <= config.low_cutoff_hz {
        return Err("High cutoff must be above the low cutoff".to_string());
    }
    if config.high_cutoff_hz >= config.sample_rate_hz / 2.0 {
        return Err("High cutoff must be below the Nyquist frequency".to_string());
    }
    if config.filter_order == 0 || config.filter_order > 8 {
        return Err("Filter order must be 1-8".to_string());
    }
    if config.smoothing_window_samples == 0 {
        return Err("Smoothing window must be at least 1 sample".to_string());
    }
    if !(0.0..=1.0).contains(&config.threshold_fraction) {
        return Err("Threshold fraction must be between 0 and 1".to_string());
    }
    if config.refractory_period_seconds < 0.0 {
        return Err("Refractory period cannot be negative".to_string());
    }
    if config.window.frame_samples == 0 {
        return Err("Frame width must be at least 1 sample".to_string());
    }
    if config.window.frame_step == 0 {
        return Err("Frame step must be at least 1 sample".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(validate_pipeline_config(&config).is_ok());
        assert_eq!(config.refractory_samples(), 500);
    }

    #[test]
    fn test_invalid_cutoffs() {
        let mut config = PipelineConfig::default();
        config.low_cutoff_hz = 0.0;
        assert!(validate_pipeline_config(&config).is_err());

        config.low_cutoff_hz = 100.0;
        config.high_cutoff_hz = 50.0;
        assert!(validate_pipeline_config(&config).is_err());

        // High cutoff at Nyquist is rejected
        config.high_cutoff_hz = 500.0;
        assert!(validate_pipeline_config(&config).is_err());
    }

    #[test]
    fn test_invalid_detection_parameters() {
        let mut config = PipelineConfig::default();
        config.threshold_fraction = 1.5;
        assert!(validate_pipeline_config(&config).is_err());

        config.threshold_fraction = 0.5;
        config.smoothing_window_samples = 0;
        assert!(validate_pipeline_config(&config).is_err());
    }

    #[test]
    fn test_invalid_frame_geometry() {
        let mut config = PipelineConfig::default();
        config.window.frame_step = 0;
        assert!(validate_pipeline_config(&config).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: PipelineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.low_cutoff_hz, deserialized.low_cutoff_hz);
        assert_eq!(config.window.frame_samples, deserialized.window.frame_samples);
    }
}
