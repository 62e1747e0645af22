// src/calibration.rs
//! Two-phase baseline/active calibration
//!
//! The operator first rests the muscle, then contracts it, each for a fixed
//! phase duration. The calibrator averages one smoothed-envelope reading per
//! completed smoothing window and derives the rising/falling decision
//! thresholds from the rest-to-active range.

use crate::config::CalibrationConfig;

/// Progress of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// No run in progress.
    Idle,
    /// Accumulating the relaxed baseline; the operator keeps the muscle at rest.
    Rest,
    /// Accumulating the contraction level; the operator flexes.
    Active,
    /// Both phases elapsed and a result was produced.
    Complete,
}

/// Levels and thresholds produced by one calibration run.
///
/// Immutable once produced; feeds the gesture state machine until the next
/// run, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    pub rest_level: f32,
    pub active_level: f32,
    pub upper_threshold: f32,
    pub lower_threshold: f32,
}

impl CalibrationResult {
    /// Whether the run observed a real contraction.
    ///
    /// A degenerate run (active at or below rest) still yields thresholds;
    /// acting on this judgment is the caller's decision, not the calibrator's.
    pub fn is_reliable(&self) -> bool {
        self.active_level > self.rest_level
    }
}

/// Timed two-phase calibration over smoothed envelope readings.
///
/// Sample-driven and non-blocking: the host feeds one reading per tick and the
/// calibrator advances phases by comparing caller-supplied timestamps against
/// the configured phase duration.
#[derive(Debug)]
pub struct Calibrator {
    phase: CalibrationPhase,
    phase_duration_ms: u64,
    upper_fraction: f32,
    lower_fraction: f32,
    phase_started_ms: u64,
    rest_sum: f32,
    rest_count: u32,
    active_sum: f32,
    active_count: u32,
}

impl Calibrator {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            phase: CalibrationPhase::Idle,
            phase_duration_ms: config.phase_duration_ms,
            upper_fraction: config.upper_fraction,
            lower_fraction: config.lower_fraction,
            phase_started_ms: 0,
            rest_sum: 0.0,
            rest_count: 0,
            active_sum: 0.0,
            active_count: 0,
        }
    }

    /// Begins a run at the rest phase, discarding any previous accumulation.
    pub fn start(&mut self, now_ms: u64) {
        self.phase = CalibrationPhase::Rest;
        self.phase_started_ms = now_ms;
        self.rest_sum = 0.0;
        self.rest_count = 0;
        self.active_sum = 0.0;
        self.active_count = 0;
        tracing::info!("calibration started: keep the muscle relaxed");
    }

    /// Feeds one smoothed envelope reading.
    ///
    /// `window_complete` marks readings taken exactly when the smoothing
    /// buffer wrapped; only those are accumulated, one per full window.
    /// Returns the result once the active phase has elapsed.
    pub fn feed(
        &mut self,
        smoothed: f32,
        window_complete: bool,
        now_ms: u64,
    ) -> Option<CalibrationResult> {
        match self.phase {
            CalibrationPhase::Idle | CalibrationPhase::Complete => None,
            CalibrationPhase::Rest => {
                if now_ms.saturating_sub(self.phase_started_ms) >= self.phase_duration_ms {
                    self.phase = CalibrationPhase::Active;
                    self.phase_started_ms = now_ms;
                    tracing::info!("calibration rest phase done: now flex the muscle");
                    // The boundary reading counts toward the active phase.
                    if window_complete {
                        self.active_sum += smoothed;
                        self.active_count += 1;
                    }
                } else if window_complete {
                    self.rest_sum += smoothed;
                    self.rest_count += 1;
                }
                None
            }
            CalibrationPhase::Active => {
                if now_ms.saturating_sub(self.phase_started_ms) >= self.phase_duration_ms {
                    self.phase = CalibrationPhase::Complete;
                    Some(self.finish())
                } else {
                    if window_complete {
                        self.active_sum += smoothed;
                        self.active_count += 1;
                    }
                    None
                }
            }
        }
    }

    /// Current phase, for operator prompting.
    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    fn finish(&self) -> CalibrationResult {
        // A phase that saw no complete windows contributes a zero level
        // instead of dividing by zero.
        let rest_level = if self.rest_count > 0 {
            self.rest_sum / self.rest_count as f32
        } else {
            0.0
        };
        let active_level = if self.active_count > 0 {
            self.active_sum / self.active_count as f32
        } else {
            0.0
        };

        let range = active_level - rest_level;
        let result = CalibrationResult {
            rest_level,
            active_level,
            upper_threshold: rest_level + range * self.upper_fraction,
            lower_threshold: rest_level + range * self.lower_fraction,
        };

        tracing::info!(
            rest_level,
            active_level,
            upper_threshold = result.upper_threshold,
            lower_threshold = result.lower_threshold,
            reliable = result.is_reliable(),
            "calibration complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CalibrationConfig {
        CalibrationConfig {
            phase_duration_ms: 1000,
            upper_fraction: 0.6,
            lower_fraction: 0.4,
        }
    }

    /// Drives a full run with constant per-window readings for each phase.
    fn run(rest_reading: f32, active_reading: f32) -> CalibrationResult {
        let mut cal = Calibrator::new(&config());
        cal.start(0);

        let mut result = None;
        // One window-complete reading every 50 ms, 1000 ms per phase.
        for tick in 1..=41 {
            let now = tick * 50;
            let reading = if now < 1000 { rest_reading } else { active_reading };
            if let Some(r) = cal.feed(reading, true, now) {
                result = Some(r);
                break;
            }
        }
        result.expect("calibration should complete after both phases")
    }

    #[test]
    fn test_levels_average_phase_readings() {
        let result = run(2.0, 10.0);
        assert!((result.rest_level - 2.0).abs() < 1e-4, "rest {}", result.rest_level);
        assert!((result.active_level - 10.0).abs() < 1e-4, "active {}", result.active_level);
    }

    #[test]
    fn test_threshold_ordering() {
        let result = run(2.0, 12.0);
        // upper = 2 + 0.6*10 = 8, lower = 2 + 0.4*10 = 6
        assert!((result.upper_threshold - 8.0).abs() < 1e-4);
        assert!((result.lower_threshold - 6.0).abs() < 1e-4);
        assert!(result.lower_threshold < result.upper_threshold);
        assert!(result.rest_level < result.lower_threshold);
        assert!(result.upper_threshold < result.active_level);
        assert!(result.is_reliable());
    }

    #[test]
    fn test_degenerate_run_does_not_fail() {
        let result = run(10.0, 4.0);
        // Negative range: thresholds land between active and rest.
        assert!(result.upper_threshold < result.rest_level);
        assert!(result.upper_threshold < result.lower_threshold);
        assert!(!result.is_reliable());
    }

    #[test]
    fn test_zero_window_phases_default_to_zero() {
        let mut cal = Calibrator::new(&config());
        cal.start(0);

        // Ticks arrive but no window ever completes.
        assert!(cal.feed(5.0, false, 500).is_none());
        assert!(cal.feed(5.0, false, 1000).is_none());
        assert_eq!(cal.phase(), CalibrationPhase::Active);
        let result = cal.feed(5.0, false, 2000).expect("run completes");

        assert_eq!(result.rest_level, 0.0);
        assert_eq!(result.active_level, 0.0);
        assert_eq!(result.upper_threshold, 0.0);
        assert_eq!(result.lower_threshold, 0.0);
    }

    #[test]
    fn test_incomplete_windows_not_accumulated() {
        let mut cal = Calibrator::new(&config());
        cal.start(0);

        // Noise readings without a completed window must not bias the level.
        for tick in 1..=19 {
            cal.feed(1000.0, false, tick * 50);
        }
        cal.feed(3.0, true, 999);
        cal.feed(3.0, true, 1000); // boundary: first active reading
        let result = cal.feed(3.0, true, 2000).expect("run completes");
        assert!((result.rest_level - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_feed_before_start_is_inert() {
        let mut cal = Calibrator::new(&config());
        assert_eq!(cal.phase(), CalibrationPhase::Idle);
        assert!(cal.feed(5.0, true, 100).is_none());
        assert_eq!(cal.phase(), CalibrationPhase::Idle);
    }

    #[test]
    fn test_restart_discards_previous_run() {
        let mut cal = Calibrator::new(&config());
        cal.start(0);
        cal.feed(100.0, true, 500);
        cal.start(10_000);
        cal.feed(1.0, true, 10_500);
        cal.feed(9.0, true, 11_500);
        let result = cal.feed(0.0, false, 12_500).expect("run completes");
        assert!((result.rest_level - 1.0).abs() < 1e-4, "rest {}", result.rest_level);
    }
}
