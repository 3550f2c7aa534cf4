// src/config/mod.rs
//! Pipeline configuration structures and loading.

pub mod pipeline_config;

pub use pipeline_config::{validate_pipeline_config, PipelineConfig, WindowConfig};

use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("configuration file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for a [`PipelineConfig`].
    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed configuration violates a numeric constraint.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate a pipeline configuration from a TOML file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    validate_pipeline_config(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}
