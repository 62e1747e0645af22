// src/config/pipeline_config.rs
//! Pipeline configuration structures
//!
//! Defaults match the reference prosthetic hand firmware: 1000 Hz sampling,
//! 50 Hz mains notch, a 50-sample smoothing window, 2.5 s calibration phases,
//! 300 ms debounce, and a 1 s double-flex window.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Complete pipeline configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub smoothing: SmoothingConfig,
    pub calibration: CalibrationConfig,
    pub gesture: GestureConfig,
}

/// Conditioning chain configuration.
///
/// `sample_rate_hz` and `notch_hz` are raw values on purpose: an unsupported
/// pair is not a configuration error, it selects the chain's bypass mode.
/// Rate and notch frequency are fixed after initialization; only the three
/// enable flags may be toggled at runtime.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub sample_rate_hz: u32,
    pub notch_hz: u32,
    pub notch_enabled: bool,
    pub lowpass_enabled: bool,
    pub highpass_enabled: bool,
}

/// Envelope smoothing window configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SmoothingConfig {
    pub window_samples: usize,
}

/// Two-phase calibration configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Duration of each phase (rest, then active).
    pub phase_duration_ms: u64,
    /// Fraction of the rest-to-active range at which the rising threshold sits.
    pub upper_fraction: f32,
    /// Fraction of the rest-to-active range at which the falling threshold sits.
    pub lower_fraction: f32,
}

/// Gesture decision timing configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum time between accepted state transitions.
    pub debounce_ms: u64,
    /// Window within which a second flex counts as a double-flex gesture.
    pub gesture_window_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000,
            notch_hz: 50,
            notch_enabled: true,
            lowpass_enabled: true,
            highpass_enabled: true,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window_samples: 50 }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            phase_duration_ms: 2500,
            upper_fraction: 0.6,
            lower_fraction: 0.4,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            gesture_window_ms: 1000,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration.
    ///
    /// An unsupported sample-rate/notch pair passes validation: the chain
    /// handles it by falling back to bypass, observable via
    /// [`FilterChain::is_bypassed`](crate::processing::FilterChain::is_bypassed).
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.smoothing.window_samples == 0 {
            return Err(PipelineError::config(
                "smoothing.window_samples",
                "smoothing window must hold at least one sample",
            ));
        }
        if self.calibration.phase_duration_ms == 0 {
            return Err(PipelineError::config(
                "calibration.phase_duration_ms",
                "calibration phases must have a nonzero duration",
            ));
        }
        let lower = self.calibration.lower_fraction;
        let upper = self.calibration.upper_fraction;
        if !(lower > 0.0 && upper <= 1.0 && lower < upper) {
            return Err(PipelineError::config(
                "calibration.upper_fraction",
                format!(
                    "threshold fractions must satisfy 0 < lower < upper <= 1, got lower={} upper={}",
                    lower, upper
                ),
            ));
        }
        if self.gesture.gesture_window_ms == 0 {
            return Err(PipelineError::config(
                "gesture.gesture_window_ms",
                "double-flex window must be nonzero",
            ));
        }
        if self.gesture.debounce_ms >= self.gesture.gesture_window_ms {
            return Err(PipelineError::config(
                "gesture.debounce_ms",
                format!(
                    "debounce ({} ms) must be shorter than the double-flex window ({} ms), \
                     otherwise a second flex can never be accepted in time",
                    self.gesture.debounce_ms, self.gesture.gesture_window_ms
                ),
            ));
        }
        Ok(())
    }
}
