// src/config/mod.rs
//! Pipeline configuration management

pub mod loader;
pub mod pipeline_config;

pub use pipeline_config::{
    CalibrationConfig, FilterConfig, GestureConfig, PipelineConfig, SmoothingConfig,
};
