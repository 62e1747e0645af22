// src/processing/biquad.rs
//! Second-order recursive filter stage with fixed coefficients
//!
//! One stage implements either the low-pass or the high-pass leg of the
//! conditioning chain. Coefficients come from the precomputed tables in
//! [`coefficients`](super::coefficients); the stage itself is a plain
//! direct-form-II-transposed recursion over two state values.

use super::coefficients::{
    SampleRate, HPF_DENOMINATOR, HPF_NUMERATOR, LPF_DENOMINATOR, LPF_NUMERATOR,
};

/// Selects which coefficient table a [`BiquadStage`] loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

/// Single second-order IIR section with table-driven coefficients.
#[derive(Debug, Clone)]
pub struct BiquadStage {
    num: [f32; 3],
    den: [f32; 3],
    state: [f32; 2],
}

impl BiquadStage {
    /// Creates a stage for the given kind and sample rate, with zeroed state.
    pub fn new(kind: FilterKind, rate: SampleRate) -> Self {
        let idx = rate.index();
        let (num, den) = match kind {
            FilterKind::Lowpass => (LPF_NUMERATOR[idx], LPF_DENOMINATOR[idx]),
            FilterKind::Highpass => (HPF_NUMERATOR[idx], HPF_DENOMINATOR[idx]),
        };
        Self {
            num,
            den,
            state: [0.0; 2],
        }
    }

    /// Processes a single sample.
    ///
    /// Direct-form-II-transposed recursion:
    /// ```text
    /// w      = (x - a1*s0 - a2*s1) / a0
    /// y      = b0*w + b1*s0 + b2*s1
    /// s1, s0 = s0, w
    /// ```
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        let w = (input - self.den[1] * self.state[0] - self.den[2] * self.state[1]) / self.den[0];
        let output = self.num[0] * w + self.num[1] * self.state[0] + self.num[2] * self.state[1];
        self.state[1] = self.state[0];
        self.state[0] = w;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_zero() {
        let stage = BiquadStage::new(FilterKind::Lowpass, SampleRate::Hz1000);
        assert_eq!(stage.state, [0.0, 0.0]);
    }

    #[test]
    fn test_first_output_matches_direct_computation() {
        // With zero state, the first output is num[0]/den[0] * input.
        let mut stage = BiquadStage::new(FilterKind::Lowpass, SampleRate::Hz500);
        let out = stage.update(1.0);
        assert!((out - 0.3913).abs() < 1e-6, "got {}", out);

        let mut stage = BiquadStage::new(FilterKind::Highpass, SampleRate::Hz1000);
        let out = stage.update(1.0);
        assert!((out - 0.9150).abs() < 1e-6, "got {}", out);
    }

    #[test]
    fn test_stage_determinism() {
        let mut a = BiquadStage::new(FilterKind::Highpass, SampleRate::Hz500);
        let mut b = BiquadStage::new(FilterKind::Highpass, SampleRate::Hz500);

        for i in 0..256 {
            let input = ((i as f32) * 0.37).sin() * 512.0;
            let ya = a.update(input);
            let yb = b.update(input);
            assert_eq!(ya.to_bits(), yb.to_bits());
        }
    }

    #[test]
    fn test_lowpass_settles_on_dc() {
        let mut stage = BiquadStage::new(FilterKind::Lowpass, SampleRate::Hz1000);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = stage.update(100.0);
        }
        // Unity DC gain within coefficient rounding
        assert!((out - 100.0).abs() < 2.0, "got {}", out);
    }

    #[test]
    fn test_highpass_rejects_dc() {
        let mut stage = BiquadStage::new(FilterKind::Highpass, SampleRate::Hz1000);
        let mut out = f32::MAX;
        for _ in 0..2000 {
            out = stage.update(100.0);
        }
        assert!(out.abs() < 1.0, "got {}", out);
    }
}
