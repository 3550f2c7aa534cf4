// src/acquisition/mod.rs
//! Decoupling boundary between sample acquisition and the pipeline.

pub mod sample_queue;

pub use sample_queue::{OverflowPolicy, SampleQueue};
