// src/config/loader.rs
//! TOML configuration loading
//!
//! There is no runtime reconfiguration contract beyond the chain's enable
//! flags, so loading is a one-shot parse-and-validate at startup.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::PipelineError;

impl PipelineConfig {
    /// Parses and validates a configuration from a TOML string.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads, parses, and validates a configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading pipeline configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
