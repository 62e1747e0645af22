// src/error.rs
//! Error types for the pipeline's configuration surface
//!
//! The numeric core never fails: unsupported filter configurations degrade to
//! bypass and degenerate calibrations still produce thresholds. Errors only
//! arise while loading and validating configuration.

use thiserror::Error;

/// Errors produced while building or loading a pipeline configuration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configuration field failed validation.
    #[error("invalid configuration for `{field}`: {reason}")]
    Config {
        field: &'static str,
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed as TOML.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
}

impl PipelineError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::Config {
            field,
            reason: reason.into(),
        }
    }
}
