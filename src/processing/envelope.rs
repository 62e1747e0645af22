// src/processing/envelope.rs
//! Rectification and rolling-average envelope smoothing
//!
//! Fixed-capacity circular buffer with a running sum. Capacity is set once at
//! construction and never grows; the per-sample cost is constant.

/// Rolling-average smoother over rectified filter output.
///
/// Before the buffer fills for the first time, the reported average divides by
/// the number of samples written so far, so a constant input reads back
/// exactly during warm-up.
#[derive(Debug, Clone)]
pub struct EnvelopeSmoother {
    buffer: Box<[f32]>,
    sum: f32,
    cursor: usize,
    filled: bool,
    wrapped: bool,
}

impl EnvelopeSmoother {
    /// Creates a smoother with the given window size in samples.
    ///
    /// Window size is validated upstream by the configuration layer; a zero
    /// window is clamped to one sample here so the buffer arithmetic stays
    /// well-defined.
    pub fn new(window_samples: usize) -> Self {
        let capacity = window_samples.max(1);
        Self {
            buffer: vec![0.0; capacity].into_boxed_slice(),
            sum: 0.0,
            cursor: 0,
            filled: false,
            wrapped: false,
        }
    }

    /// Rectifies one filtered sample into the window and returns the smoothed
    /// envelope value.
    pub fn update(&mut self, filtered: f32) -> f32 {
        let magnitude = filtered.abs();

        self.sum -= self.buffer[self.cursor];
        self.buffer[self.cursor] = magnitude;
        self.sum += magnitude;

        let smoothed = if self.filled {
            self.sum / self.buffer.len() as f32
        } else {
            self.sum / (self.cursor + 1) as f32
        };

        self.cursor += 1;
        self.wrapped = self.cursor == self.buffer.len();
        if self.wrapped {
            self.cursor = 0;
            self.filled = true;
        }

        smoothed
    }

    /// True when the previous [`update`](Self::update) completed a full window
    /// (the write cursor wrapped back to slot zero).
    ///
    /// The calibrator samples the envelope on this signal, once per window.
    pub fn just_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Clears the buffer, running sum, cursor, and fill state.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.sum = 0.0;
        self.cursor = 0;
        self.filled = false;
        self.wrapped = false;
    }

    /// Window size in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[cfg(test)]
    fn recomputed_sum(&self) -> f32 {
        self.buffer.iter().sum()
    }
}
