// src/utils/time.rs
//! Millisecond clock abstraction
//!
//! The pipeline itself takes timestamps as arguments and trusts the caller's
//! sampling periodicity; this trait gives hosts and tests a uniform clock to
//! produce those timestamps from.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time provider trait for dependency injection and testing.
pub trait TimeProvider: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// System time provider using the actual system clock.
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_ms(&self) -> u64 {
        current_timestamp_ms()
    }
}

/// Mock time provider for deterministic testing.
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_ms: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_ms),
        }
    }

    pub fn advance_by(&self, ms: u64) {
        self.current_time.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set_time(&self, ms: u64) {
        self.current_time.store(ms, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_ms(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Milliseconds since the Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
