// src/processing/mod.rs
//! Signal conditioning for raw EMG samples

pub mod biquad;
pub mod coefficients;
pub mod envelope;
pub mod filter_chain;
pub mod notch;

pub use biquad::{BiquadStage, FilterKind};
pub use coefficients::{NotchFrequency, SampleRate};
pub use envelope::EnvelopeSmoother;
pub use filter_chain::FilterChain;
pub use notch::NotchStage;
