//! EMG-Pipeline: signal conditioning and gesture decisions for prosthetic control
//!
//! This library turns a stream of raw EMG samples into discrete hand commands.
//! It provides:
//!
//! - A cascaded digital filter chain (anti-hum notch, low-pass, high-pass)
//!   with fixed coefficient tables for 500 Hz / 1000 Hz sampling
//! - Rectification and rolling-average envelope smoothing
//! - A timed two-phase rest/active calibration procedure
//! - A debounced threshold state machine with double-flex gesture detection
//!
//! # Quick Start
//!
//! ```rust
//! use emg_pipeline::{ActuatorSink, EmgPipeline, PipelineConfig};
//!
//! struct LogSink;
//! impl ActuatorSink for LogSink {
//!     fn drive_open(&mut self) { println!("open"); }
//!     fn drive_closed(&mut self) { println!("close"); }
//!     fn special_gesture(&mut self) { println!("special gesture"); }
//!     fn indicator(&mut self, on: bool) { println!("indicator {}", on); }
//! }
//!
//! let mut pipeline = EmgPipeline::new(PipelineConfig::default())?;
//! let mut sink = LogSink;
//!
//! pipeline.begin_calibration(0);
//! // One raw sample per timer tick; timestamps come from the host.
//! let output = pipeline.process_sample(512, 1, &mut sink);
//! println!("envelope: {}", output.smoothed_envelope);
//! # Ok::<(), emg_pipeline::PipelineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calibration;
pub mod config;
pub mod error;
pub mod gesture;
pub mod pipeline;
pub mod processing;
pub mod utils;

// Re-export commonly used types for convenience
pub use calibration::{CalibrationPhase, CalibrationResult, Calibrator};
pub use config::{
    CalibrationConfig, FilterConfig, GestureConfig, PipelineConfig, SmoothingConfig,
};
pub use error::PipelineError;
pub use gesture::{ActuatorSink, FistState, GestureStateMachine, SignalState};
pub use pipeline::{EmgPipeline, PipelineMode, PipelineOutput};
pub use processing::{
    BiquadStage, EnvelopeSmoother, FilterChain, FilterKind, NotchFrequency, NotchStage, SampleRate,
};
pub use utils::time::{current_timestamp_ms, MockTimeProvider, SystemTimeProvider, TimeProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }
}
