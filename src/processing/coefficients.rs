// src/processing/coefficients.rs
//! Fixed filter coefficient tables for the EMG conditioning chain
//!
//! All stages run with precomputed Butterworth-style coefficients designed for
//! the two supported sample rates (500 Hz, 1000 Hz). Tables are indexed by the
//! sample-rate index (`SampleRate::index`), and for the anti-hum cascade also
//! by mains frequency. These are physical design constants and must not be
//! recomputed at runtime.

/// Low-pass numerator taps, `[rate_index][tap]`.
pub(crate) const LPF_NUMERATOR: [[f32; 3]; 2] = [
    [0.3913, 0.7827, 0.3913],
    [0.1311, 0.2622, 0.1311],
];

/// Low-pass denominator taps, `[rate_index][tap]`.
pub(crate) const LPF_DENOMINATOR: [[f32; 3]; 2] = [
    [1.0000, 0.3695, 0.1958],
    [1.0000, -0.7478, 0.2722],
];

/// High-pass numerator taps, `[rate_index][tap]`.
pub(crate) const HPF_NUMERATOR: [[f32; 3]; 2] = [
    [0.8371, -1.6742, 0.8371],
    [0.9150, -1.8299, 0.9150],
];

/// High-pass denominator taps, `[rate_index][tap]`.
pub(crate) const HPF_DENOMINATOR: [[f32; 3]; 2] = [
    [1.0000, -1.6475, 0.7009],
    [1.0000, -1.8227, 0.8372],
];

/// 50 Hz anti-hum numerator taps, `[rate_index][tap]` (two cascaded sections).
pub(crate) const AHF_NUMERATOR_50HZ: [[f32; 6]; 2] = [
    [0.9522, -1.5407, 0.9522, 0.8158, -0.8045, 0.0855],
    [0.5869, -1.1146, 0.5869, 1.0499, -2.0000, 1.0499],
];

/// 50 Hz anti-hum denominator taps.
pub(crate) const AHF_DENOMINATOR_50HZ: [[f32; 6]; 2] = [
    [1.0000, -1.5395, 0.9056, 1.0000, -1.1187, 0.3129],
    [1.0000, -1.8844, 0.9893, 1.0000, -1.8991, 0.9892],
];

/// 50 Hz anti-hum output gain, `[rate_index]`.
pub(crate) const AHF_OUTPUT_GAIN_50HZ: [f32; 2] = [1.3422, 1.4399];

/// 60 Hz anti-hum numerator taps.
pub(crate) const AHF_NUMERATOR_60HZ: [[f32; 6]; 2] = [
    [0.9528, -1.3891, 0.9528, 0.8272, -0.7225, 0.0264],
    [0.5824, -1.0810, 0.5824, 1.0736, -2.0000, 1.0736],
];

/// 60 Hz anti-hum denominator taps.
pub(crate) const AHF_DENOMINATOR_60HZ: [[f32; 6]; 2] = [
    [1.0000, -1.3880, 0.9066, 1.0000, -0.9739, 0.2371],
    [1.0000, -1.8407, 0.9894, 1.0000, -1.8584, 0.9891],
];

/// 60 Hz anti-hum output gain.
pub(crate) const AHF_OUTPUT_GAIN_60HZ: [f32; 2] = [1.3430, 1.4206];

/// Supported sample rates for the fixed coefficient tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz500,
    Hz1000,
}

impl SampleRate {
    /// Map a raw configured rate onto a supported table index, if any.
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            500 => Some(SampleRate::Hz500),
            1000 => Some(SampleRate::Hz1000),
            _ => None,
        }
    }

    /// Row index into the coefficient tables.
    pub(crate) fn index(self) -> usize {
        match self {
            SampleRate::Hz500 => 0,
            SampleRate::Hz1000 => 1,
        }
    }

    /// Nominal rate in Hz.
    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz500 => 500,
            SampleRate::Hz1000 => 1000,
        }
    }
}

/// Supported mains-hum frequencies for the anti-hum cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchFrequency {
    Hz50,
    Hz60,
}

impl NotchFrequency {
    /// Map a raw configured mains frequency onto a supported value, if any.
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            50 => Some(NotchFrequency::Hz50),
            60 => Some(NotchFrequency::Hz60),
            _ => None,
        }
    }

    /// Nominal mains frequency in Hz.
    pub fn hz(self) -> u32 {
        match self {
            NotchFrequency::Hz50 => 50,
            NotchFrequency::Hz60 => 60,
        }
    }
}
