// src/processing/mod.rs
//! Signal conditioning and flexion detection stages.

pub mod detector;
pub mod envelope;
pub mod filters;
pub mod pipeline;
pub mod threshold;
pub mod window;

pub use detector::{DetectionSummary, FlexionDetector, FlexionEvent};
pub use envelope::{extract_envelope, moving_average, rectify};
pub use filters::{design_bandpass, filtfilt, FilterCoefficients};
pub use pipeline::{remove_dc_offset, ConditionedSignal, FlexionPipeline};
pub use threshold::Threshold;
pub use window::{FrameReport, RunStatus, WindowController};
