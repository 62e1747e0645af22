// src/gesture.rs
//! Debounced threshold crossing and double-flex gesture detection
//!
//! A Mealy-style machine: transitions both change state and emit actuator
//! commands through an [`ActuatorSink`]. Hysteresis comes from the calibrated
//! upper/lower thresholds, flicker rejection from the debounce interval, and
//! the double-flex "special gesture" from two rising crossings inside the
//! gesture window.

use crate::calibration::CalibrationResult;
use crate::config::GestureConfig;

/// Commands the machine emits as transition side effects.
///
/// Actuator addressing, servo angles, and motion timing belong to the
/// implementer; the machine only decides *what* should happen.
pub trait ActuatorSink {
    /// Drive the hand to the open position.
    fn drive_open(&mut self);
    /// Drive the hand to the closed position.
    fn drive_closed(&mut self);
    /// Perform the preconfigured special gesture.
    fn special_gesture(&mut self);
    /// Switch the activity indicator on or off.
    fn indicator(&mut self, on: bool);
}

/// Hand posture driven by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FistState {
    Open,
    Closed,
    SpecialGesture,
}

/// Which side of the hysteresis band the envelope was last on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    BelowThreshold,
    AboveThreshold,
}

/// Threshold/gesture decision machine over the smoothed envelope.
///
/// Timestamps are caller-supplied milliseconds from any monotonic origin.
/// Flex timing uses `Option` rather than a zero sentinel so the very first
/// crossing after construction is never mistaken for a recent flex or
/// suppressed by a phantom earlier transition.
#[derive(Debug)]
pub struct GestureStateMachine {
    upper_threshold: f32,
    lower_threshold: f32,
    debounce_ms: u64,
    gesture_window_ms: u64,
    signal_state: SignalState,
    fist_state: FistState,
    flex_count: u8,
    last_flex_ms: Option<u64>,
    last_state_change_ms: Option<u64>,
}

impl GestureStateMachine {
    /// Builds the machine from timing configuration and calibrated thresholds.
    ///
    /// Initial state is `{Open, BelowThreshold}`.
    pub fn new(config: &GestureConfig, calibration: &CalibrationResult) -> Self {
        Self {
            upper_threshold: calibration.upper_threshold,
            lower_threshold: calibration.lower_threshold,
            debounce_ms: config.debounce_ms,
            gesture_window_ms: config.gesture_window_ms,
            signal_state: SignalState::BelowThreshold,
            fist_state: FistState::Open,
            flex_count: 0,
            last_flex_ms: None,
            last_state_change_ms: None,
        }
    }

    /// Evaluates one smoothed envelope reading.
    ///
    /// Transition evaluation is skipped while inside the debounce interval,
    /// but a stale double-flex window still expires.
    pub fn update(&mut self, smoothed: f32, now_ms: u64, sink: &mut dyn ActuatorSink) {
        let debounced = self
            .last_state_change_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < self.debounce_ms);

        if !debounced {
            if self.signal_state == SignalState::BelowThreshold && smoothed >= self.upper_threshold
            {
                self.on_rising_crossing(now_ms, sink);
            } else if self.signal_state == SignalState::AboveThreshold
                && smoothed <= self.lower_threshold
            {
                self.on_falling_crossing(now_ms, sink);
            }
        }

        // The flex window expires even while debounced or with no crossing.
        if self
            .last_flex_ms
            .is_some_and(|t| now_ms.saturating_sub(t) > self.gesture_window_ms)
        {
            self.flex_count = 0;
        }
    }

    fn on_rising_crossing(&mut self, now_ms: u64, sink: &mut dyn ActuatorSink) {
        self.signal_state = SignalState::AboveThreshold;

        let within_window = self
            .last_flex_ms
            .is_some_and(|t| now_ms.saturating_sub(t) <= self.gesture_window_ms);

        if within_window {
            self.flex_count += 1;
            if self.flex_count == 2 {
                self.fist_state = FistState::SpecialGesture;
                tracing::debug!(now_ms, "double flex: special gesture");
                sink.special_gesture();
                self.flex_count = 0;
            }
        } else {
            self.flex_count = 1;
            if self.fist_state != FistState::SpecialGesture {
                match self.fist_state {
                    FistState::Open => {
                        self.fist_state = FistState::Closed;
                        tracing::debug!(now_ms, "flex: closing hand");
                        sink.drive_closed();
                        sink.indicator(true);
                    }
                    FistState::Closed => {
                        self.fist_state = FistState::Open;
                        tracing::debug!(now_ms, "flex: opening hand");
                        sink.drive_open();
                        sink.indicator(false);
                    }
                    FistState::SpecialGesture => unreachable!(),
                }
            }
        }

        self.last_flex_ms = Some(now_ms);
        self.last_state_change_ms = Some(now_ms);
    }

    fn on_falling_crossing(&mut self, now_ms: u64, sink: &mut dyn ActuatorSink) {
        self.signal_state = SignalState::BelowThreshold;
        self.last_state_change_ms = Some(now_ms);

        // Releasing the contraction ends the special gesture.
        if self.fist_state == FistState::SpecialGesture {
            self.fist_state = FistState::Open;
            tracing::debug!(now_ms, "special gesture released: opening hand");
            sink.drive_open();
            sink.indicator(false);
        }
    }

    pub fn fist_state(&self) -> FistState {
        self.fist_state
    }

    pub fn signal_state(&self) -> SignalState {
        self.signal_state
    }

    /// Rising (closing) decision threshold.
    pub fn upper_threshold(&self) -> f32 {
        self.upper_threshold
    }

    /// Falling (release) decision threshold.
    pub fn lower_threshold(&self) -> f32 {
        self.lower_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records emitted commands for assertion.
    #[derive(Debug, Default, PartialEq)]
    struct RecordingSink {
        commands: Vec<Command>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Command {
        DriveOpen,
        DriveClosed,
        SpecialGesture,
        IndicatorOn,
        IndicatorOff,
    }

    impl ActuatorSink for RecordingSink {
        fn drive_open(&mut self) {
            self.commands.push(Command::DriveOpen);
        }
        fn drive_closed(&mut self) {
            self.commands.push(Command::DriveClosed);
        }
        fn special_gesture(&mut self) {
            self.commands.push(Command::SpecialGesture);
        }
        fn indicator(&mut self, on: bool) {
            self.commands.push(if on {
                Command::IndicatorOn
            } else {
                Command::IndicatorOff
            });
        }
    }

    fn machine(upper: f32, lower: f32) -> GestureStateMachine {
        let config = GestureConfig {
            debounce_ms: 300,
            gesture_window_ms: 1000,
        };
        let calibration = CalibrationResult {
            rest_level: 0.0,
            active_level: upper / 0.6,
            upper_threshold: upper,
            lower_threshold: lower,
        };
        GestureStateMachine::new(&config, &calibration)
    }

    #[test]
    fn test_initial_state() {
        let m = machine(10.0, 2.0);
        assert_eq!(m.fist_state(), FistState::Open);
        assert_eq!(m.signal_state(), SignalState::BelowThreshold);
    }

    #[test]
    fn test_single_flex_closes_then_opens() {
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink);
        assert_eq!(m.fist_state(), FistState::Closed);
        assert_eq!(m.signal_state(), SignalState::AboveThreshold);
        assert_eq!(sink.commands, vec![Command::DriveClosed, Command::IndicatorOn]);

        // Release, then flex again after the window has lapsed
        m.update(0.0, 400, &mut sink);
        assert_eq!(m.signal_state(), SignalState::BelowThreshold);

        m.update(12.0, 1500, &mut sink);
        assert_eq!(m.fist_state(), FistState::Open);
        assert_eq!(
            sink.commands,
            vec![
                Command::DriveClosed,
                Command::IndicatorOn,
                Command::DriveOpen,
                Command::IndicatorOff,
            ]
        );
    }

    #[test]
    fn test_double_flex_triggers_special_gesture() {
        // Timeline pinned by the design scenario: upper=10, lower=2,
        // window=1000, debounce=300.
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink); // first flex, hand closes
        assert_eq!(m.fist_state(), FistState::Closed);

        m.update(0.0, 350, &mut sink); // drops below lower threshold
        assert_eq!(m.signal_state(), SignalState::BelowThreshold);

        m.update(12.0, 700, &mut sink); // second flex inside the window
        assert_eq!(m.fist_state(), FistState::SpecialGesture);
        assert_eq!(sink.commands.last(), Some(&Command::SpecialGesture));
    }

    #[test]
    fn test_special_gesture_releases_to_open() {
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink);
        m.update(0.0, 350, &mut sink);
        m.update(12.0, 700, &mut sink);
        assert_eq!(m.fist_state(), FistState::SpecialGesture);

        m.update(0.0, 1100, &mut sink);
        assert_eq!(m.fist_state(), FistState::Open);
        assert_eq!(m.signal_state(), SignalState::BelowThreshold);
        assert_eq!(
            &sink.commands[sink.commands.len() - 2..],
            &[Command::DriveOpen, Command::IndicatorOff]
        );
    }

    #[test]
    fn test_debounce_suppresses_transition() {
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink);
        assert_eq!(m.signal_state(), SignalState::AboveThreshold);

        // Falls below lower threshold 200 ms later: inside debounce, ignored.
        m.update(0.0, 200, &mut sink);
        assert_eq!(m.signal_state(), SignalState::AboveThreshold);
        assert_eq!(sink.commands.len(), 2);

        // Same crossing after the debounce interval is accepted.
        m.update(0.0, 300, &mut sink);
        assert_eq!(m.signal_state(), SignalState::BelowThreshold);
    }

    #[test]
    fn test_stale_window_resets_flex_count() {
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink); // flex_count = 1
        m.update(0.0, 400, &mut sink);

        // No crossing here, but the window has lapsed: the earlier flex is
        // forgotten.
        m.update(0.0, 1200, &mut sink);

        // A new flex now toggles instead of completing a double flex.
        m.update(12.0, 1300, &mut sink);
        assert_eq!(m.fist_state(), FistState::Open);
        assert_ne!(sink.commands.last(), Some(&Command::SpecialGesture));
    }

    #[test]
    fn test_window_expires_even_while_debounced() {
        let config = GestureConfig {
            debounce_ms: 300,
            gesture_window_ms: 100,
        };
        let calibration = CalibrationResult {
            rest_level: 0.0,
            active_level: 20.0,
            upper_threshold: 10.0,
            lower_threshold: 2.0,
        };
        let mut m = GestureStateMachine::new(&config, &calibration);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink); // flex_count = 1
        // 150 ms later: still inside debounce, but past the gesture window.
        m.update(0.0, 150, &mut sink);
        assert_eq!(m.flex_count, 0);
    }

    #[test]
    fn test_no_double_count_without_release() {
        let mut m = machine(10.0, 2.0);
        let mut sink = RecordingSink::default();

        m.update(12.0, 0, &mut sink);
        // Envelope stays high: no second rising crossing, no double flex.
        m.update(12.0, 400, &mut sink);
        m.update(12.0, 800, &mut sink);
        assert_eq!(m.fist_state(), FistState::Closed);
    }
}
