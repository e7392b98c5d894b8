// src/clock.rs

// clock module definition and implementations

// dependencies
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync) and monotonic: successive
/// readings never decrease.
/// The `now` method returns the current time in nanoseconds as a u64.
/// Limiters read the clock once per decision, so a test clock can drive them
/// deterministically without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;
}

pub(crate) const NANOS_PER_SEC: f64 = 1_000_000_000.0;

// converts a non-negative, finite number of seconds into a Duration, rounding up
pub(crate) fn ceil_duration(secs: f64) -> Duration {
    Duration::from_nanos((secs * NANOS_PER_SEC).ceil() as u64)
}

/// Clock error type
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("clock reading unavailable")]
    Unavailable,
}

/// Monotonic clock backed by `std::time::Instant`.
/// Returns nanoseconds elapsed since the clock was created.
/// Clones share the same anchor, so readings from clones are comparable.
/// This is the default clock used by every limiter.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Result<u64, ClockError> {
        // u64 nanoseconds cover roughly 584 years of uptime
        Ok(self.anchor.elapsed().as_nanos() as u64)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Result<u64, ClockError> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Result<u64, ClockError> {
        (**self).now()
    }
}
