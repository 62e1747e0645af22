// src/processing/filter_chain.rs
//! Cascaded conditioning chain: anti-hum notch, low-pass, high-pass
//!
//! Stage order is a design contract: notch before low-pass before high-pass.
//! The stages are not commutative, so callers must not reorder them.

use crate::config::FilterConfig;

use super::biquad::{BiquadStage, FilterKind};
use super::coefficients::{NotchFrequency, SampleRate};
use super::notch::NotchStage;

/// Full conditioning chain over raw integer EMG samples.
///
/// If the configured (sample rate, notch frequency) pair is outside the two
/// supported combinations, the chain runs in bypass mode and `update` is the
/// identity regardless of the per-stage enable flags. Bypass is queryable via
/// [`is_bypassed`](Self::is_bypassed) so a host can warn the operator.
#[derive(Debug, Clone)]
pub struct FilterChain {
    notch: NotchStage,
    lowpass: BiquadStage,
    highpass: BiquadStage,
    notch_enabled: bool,
    lowpass_enabled: bool,
    highpass_enabled: bool,
    bypass: bool,
}

impl FilterChain {
    /// Builds the chain from configuration.
    ///
    /// All three stages are initialized even when individually disabled, so
    /// enable flags can be toggled at runtime without re-initialization.
    pub fn new(config: &FilterConfig) -> Self {
        let rate = SampleRate::from_hz(config.sample_rate_hz);
        let notch_freq = NotchFrequency::from_hz(config.notch_hz);
        let bypass = rate.is_none() || notch_freq.is_none();

        if bypass {
            tracing::warn!(
                sample_rate_hz = config.sample_rate_hz,
                notch_hz = config.notch_hz,
                "unsupported filter configuration, chain running in bypass"
            );
        }

        // Stage state still gets allocated against a supported table row; a
        // bypassed chain never invokes the stages.
        let rate = rate.unwrap_or(SampleRate::Hz1000);
        let notch_freq = notch_freq.unwrap_or(NotchFrequency::Hz50);

        Self {
            notch: NotchStage::new(rate, notch_freq),
            lowpass: BiquadStage::new(FilterKind::Lowpass, rate),
            highpass: BiquadStage::new(FilterKind::Highpass, rate),
            notch_enabled: config.notch_enabled,
            lowpass_enabled: config.lowpass_enabled,
            highpass_enabled: config.highpass_enabled,
            bypass,
        }
    }

    /// Conditions one raw sample, returning the filtered value truncated back
    /// to the input's integer domain.
    pub fn update(&mut self, raw: i32) -> i32 {
        if self.bypass {
            return raw;
        }

        let mut output = raw as f32;
        if self.notch_enabled {
            output = self.notch.update(output);
        }
        if self.lowpass_enabled {
            output = self.lowpass.update(output);
        }
        if self.highpass_enabled {
            output = self.highpass.update(output);
        }
        output as i32
    }

    /// True when the configured rate/notch pair was unsupported and the chain
    /// passes samples through unchanged.
    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Toggles the anti-hum stage. Stage state is retained.
    pub fn set_notch_enabled(&mut self, enabled: bool) {
        self.notch_enabled = enabled;
    }

    /// Toggles the low-pass stage. Stage state is retained.
    pub fn set_lowpass_enabled(&mut self, enabled: bool) {
        self.lowpass_enabled = enabled;
    }

    /// Toggles the high-pass stage. Stage state is retained.
    pub fn set_highpass_enabled(&mut self, enabled: bool) {
        self.highpass_enabled = enabled;
    }
}
