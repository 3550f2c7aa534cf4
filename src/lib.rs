//! Flexion-Core: streaming EMG signal conditioning and flexion detection
//!
//! This library turns a raw EMG sample stream into a conditioned waveform
//! plus a log of timestamped muscle-flexion events. It features:
//!
//! - Band-pass Butterworth design with zero-phase (forward-backward) filtering
//! - Rectified, moving-average-smoothed envelope extraction
//! - Peak-fraction threshold estimation over the conditioned envelope
//! - A level-crossing event detector with an explicit refractory window
//! - A window controller for frame-by-frame live-display operation
//!
//! How samples are acquired and how events are displayed is out of scope;
//! the crate only provides the bounded [`acquisition::SampleQueue`] as the
//! hand-off point from an acquisition producer.
//!
//! # Quick Start
//!
//! ```rust
//! use flexion_core::{FlexionPipeline, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = FlexionPipeline::new(PipelineConfig::default())?;
//!
//!     // 2 s of silence with a short 100 Hz burst half-way through
//!     let mut samples = vec![0.0_f64; 2000];
//!     for i in 500..550 {
//!         samples[i] = (2.0 * std::f64::consts::PI * 100.0 * i as f64 / 1000.0).sin();
//!     }
//!
//!     let summary = pipeline.detect(&samples)?;
//!     println!("flexions: {} at {:?}", summary.total_events, summary.times);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types for convenience
pub use acquisition::{OverflowPolicy, SampleQueue};
pub use config::{ConfigError, PipelineConfig, WindowConfig};
pub use error::PipelineError;
pub use processing::{
    ConditionedSignal, DetectionSummary, FlexionDetector, FlexionEvent, FlexionPipeline,
    FrameReport, RunStatus, Threshold, WindowController,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
