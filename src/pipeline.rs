// src/pipeline.rs
//! Sample-driven orchestration of the conditioning and decision stages
//!
//! One raw sample enters per scheduling tick:
//! raw → filter chain → rectify/smooth → calibrator or gesture machine.
//! Calibration and normal operation are mutually exclusive; the pipeline owns
//! the mode switch and applies calibration results atomically.

use crate::calibration::{CalibrationPhase, CalibrationResult, Calibrator};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::gesture::{ActuatorSink, GestureStateMachine};
use crate::processing::{EnvelopeSmoother, FilterChain};

/// Which stage currently consumes the smoothed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// A calibration run owns the smoothing buffer.
    Calibrating,
    /// Envelope readings feed the gesture machine (or are only observed, if
    /// no calibration has been applied yet).
    Operational,
}

/// Per-tick pipeline output, mirroring the triple the reference firmware
/// streamed for plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOutput {
    pub smoothed_envelope: f32,
    pub upper_threshold: f32,
    pub lower_threshold: f32,
    pub mode: PipelineMode,
}

/// End-to-end EMG pipeline: conditioning, calibration, gesture decisions.
pub struct EmgPipeline {
    config: PipelineConfig,
    chain: FilterChain,
    smoother: EnvelopeSmoother,
    calibrator: Calibrator,
    gesture: Option<GestureStateMachine>,
    calibration: Option<CalibrationResult>,
    mode: PipelineMode,
}

impl EmgPipeline {
    /// Builds the pipeline from a validated configuration.
    ///
    /// Starts in operational mode with no thresholds applied: samples are
    /// conditioned and smoothed, but no gestures fire until a calibration run
    /// completes.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let chain = FilterChain::new(&config.filter);
        let smoother = EnvelopeSmoother::new(config.smoothing.window_samples);
        let calibrator = Calibrator::new(&config.calibration);

        Ok(Self {
            config,
            chain,
            smoother,
            calibrator,
            gesture: None,
            calibration: None,
            mode: PipelineMode::Operational,
        })
    }

    /// Admits one raw sample.
    ///
    /// Bounded-time and non-blocking; must be called once per timer tick with
    /// a monotonically non-decreasing `now_ms`.
    pub fn process_sample(
        &mut self,
        raw: i32,
        now_ms: u64,
        sink: &mut dyn ActuatorSink,
    ) -> PipelineOutput {
        let filtered = self.chain.update(raw);
        let smoothed = self.smoother.update(filtered as f32);

        match self.mode {
            PipelineMode::Calibrating => {
                let window_complete = self.smoother.just_wrapped();
                if let Some(result) = self.calibrator.feed(smoothed, window_complete, now_ms) {
                    self.apply_calibration(result);
                }
            }
            PipelineMode::Operational => {
                if let Some(gesture) = self.gesture.as_mut() {
                    gesture.update(smoothed, now_ms, sink);
                }
            }
        }

        let (upper, lower) = self
            .calibration
            .map(|c| (c.upper_threshold, c.lower_threshold))
            .unwrap_or((0.0, 0.0));

        PipelineOutput {
            smoothed_envelope: smoothed,
            upper_threshold: upper,
            lower_threshold: lower,
            mode: self.mode,
        }
    }

    /// Starts (or restarts) a calibration run.
    ///
    /// The smoothing buffer is cleared so the baseline estimate starts fresh,
    /// and the gesture machine is detached for the duration of the run.
    pub fn begin_calibration(&mut self, now_ms: u64) {
        self.smoother.reset();
        self.calibrator.start(now_ms);
        self.gesture = None;
        self.mode = PipelineMode::Calibrating;
    }

    fn apply_calibration(&mut self, result: CalibrationResult) {
        if !result.is_reliable() {
            tracing::warn!(
                rest_level = result.rest_level,
                active_level = result.active_level,
                "calibration detected no contraction, thresholds are unreliable"
            );
        }
        self.gesture = Some(GestureStateMachine::new(&self.config.gesture, &result));
        self.calibration = Some(result);
        // Operation starts from a clean envelope estimate.
        self.smoother.reset();
        self.mode = PipelineMode::Operational;
    }

    /// Current consumer of the smoothed envelope.
    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    /// Phase of the calibration run, for operator prompting.
    pub fn calibration_phase(&self) -> CalibrationPhase {
        self.calibrator.phase()
    }

    /// Result of the most recent completed calibration run.
    pub fn calibration(&self) -> Option<&CalibrationResult> {
        self.calibration.as_ref()
    }

    /// Gesture machine state, present once a calibration has been applied.
    pub fn gesture(&self) -> Option<&GestureStateMachine> {
        self.gesture.as_ref()
    }

    /// True when the configured rate/notch pair forced the conditioning chain
    /// into pass-through.
    pub fn is_filter_bypassed(&self) -> bool {
        self.chain.is_bypassed()
    }

    /// Toggles the anti-hum stage at runtime.
    pub fn set_notch_enabled(&mut self, enabled: bool) {
        self.chain.set_notch_enabled(enabled);
    }

    /// Toggles the low-pass stage at runtime.
    pub fn set_lowpass_enabled(&mut self, enabled: bool) {
        self.chain.set_lowpass_enabled(enabled);
    }

    /// Toggles the high-pass stage at runtime.
    pub fn set_highpass_enabled(&mut self, enabled: bool) {
        self.chain.set_highpass_enabled(enabled);
    }
}
