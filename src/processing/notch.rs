// src/processing/notch.rs
//! Fourth-order anti-hum (notch) filter stage
//!
//! Two cascaded second-order sections with a scalar output gain, tuned to
//! reject mains interference at 50 Hz or 60 Hz. Coefficients are fixed per
//! (sample rate, mains frequency) pair.

use super::coefficients::{
    NotchFrequency, SampleRate, AHF_DENOMINATOR_50HZ, AHF_DENOMINATOR_60HZ, AHF_NUMERATOR_50HZ,
    AHF_NUMERATOR_60HZ, AHF_OUTPUT_GAIN_50HZ, AHF_OUTPUT_GAIN_60HZ,
};

/// Dual-cascaded second-order notch section with table-driven coefficients.
#[derive(Debug, Clone)]
pub struct NotchStage {
    num: [f32; 6],
    den: [f32; 6],
    gain: f32,
    state: [f32; 4],
}

impl NotchStage {
    /// Creates a stage for the given sample rate and mains frequency, with
    /// zeroed state.
    pub fn new(rate: SampleRate, notch: NotchFrequency) -> Self {
        let idx = rate.index();
        let (num, den, gain) = match notch {
            NotchFrequency::Hz50 => (
                AHF_NUMERATOR_50HZ[idx],
                AHF_DENOMINATOR_50HZ[idx],
                AHF_OUTPUT_GAIN_50HZ[idx],
            ),
            NotchFrequency::Hz60 => (
                AHF_NUMERATOR_60HZ[idx],
                AHF_DENOMINATOR_60HZ[idx],
                AHF_OUTPUT_GAIN_60HZ[idx],
            ),
        };
        Self {
            num,
            den,
            gain,
            state: [0.0; 4],
        }
    }

    /// Processes a single sample through both cascaded sections.
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        // First section
        let stage1_out = self.num[0] * input + self.state[0];
        self.state[0] = self.num[1] * input + self.state[1] - self.den[1] * stage1_out;
        self.state[1] = self.num[2] * input - self.den[2] * stage1_out;

        // Second section
        let stage2_in = stage1_out;
        let stage2_out = self.num[3] * stage1_out + self.state[2];
        self.state[2] = self.num[4] * stage2_in + self.state[3] - self.den[4] * stage2_out;
        self.state[3] = self.num[5] * stage2_in - self.den[5] * stage2_out;

        self.gain * stage2_out
    }
}
