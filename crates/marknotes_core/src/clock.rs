//! Store-owned monotonic timestamp source.
//!
//! # Responsibility
//! - Issue epoch-millisecond timestamps for every store mutation.
//!
//! # Invariants
//! - Timestamps are strictly increasing per clock instance, so any later
//!   mutation observes a strictly greater timestamp than an earlier one
//!   even within the same wall-clock millisecond.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly monotonic epoch-millisecond clock.
#[derive(Debug, Default)]
pub struct Clock {
    last_ms: Mutex<i64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp: wall-clock time, bumped past the last
    /// issued value when the wall clock has not advanced.
    pub fn now_ms(&self) -> i64 {
        let mut last = self
            .last_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = wall_clock_ms().max(*last + 1);
        *last = next;
        next
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn wall_clock_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
