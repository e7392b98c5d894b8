// src/fixed_window.rs

// fixed window counter: one request counter per boundary-aligned window

// dependencies
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::{Clock, MonotonicClock};
use crate::config::FixedWindowConfig;
use crate::decider::{AdmissionDecider, Decision};
use crate::errors::LimiterError;

/// Admits at most `request_threshold` requests per window of `window_size`.
///
/// Windows are aligned to multiples of `window_size` on the clock's timeline
/// and are half-open, `[start, start + window_size)`, so a request arriving
/// exactly on a boundary counts against the new window. Idle gaps spanning
/// several windows collapse into a single reset.
///
/// Only the current window is counted. A caller can therefore have up to
/// `2 × request_threshold` requests admitted within one `window_size` span
/// that straddles a boundary: the tail of one window followed by the head of
/// the next. Use [`TokenBucketLimiter`](crate::TokenBucketLimiter) or
/// [`LeakingBucketLimiter`](crate::LeakingBucketLimiter) when edge bursts
/// matter.
#[derive(Debug)]
pub struct FixedWindowLimiter<C = MonotonicClock>
where
    C: Clock,
{
    window_nanos: u64,
    request_threshold: u64,
    state: Mutex<WindowState>,
    clock: C,
}

#[derive(Debug)]
struct WindowState {
    window_start: u64,
    request_count: u64,
}

impl<C> FixedWindowLimiter<C>
where
    C: Clock,
{
    /// Create a limiter from a validated config object
    pub fn with_config(config: FixedWindowConfig, clock: C) -> Result<Self, LimiterError> {
        config.validate()?;
        let window_nanos = config.window_size.as_nanos().min(u64::MAX as u128) as u64;

        tracing::debug!(
            window_nanos,
            request_threshold = config.request_threshold,
            "fixed window limiter created"
        );

        Ok(Self {
            window_nanos,
            request_threshold: config.request_threshold,
            state: Mutex::new(WindowState {
                window_start: 0,
                request_count: 0,
            }),
            clock,
        })
    }

    // accessor method to return the window size
    pub fn window_size(&self) -> Duration {
        Duration::from_nanos(self.window_nanos)
    }

    // accessor method to return the per-window threshold
    pub fn request_threshold(&self) -> u64 {
        self.request_threshold
    }

    /// Requests admitted in the window observed by the most recent decision.
    pub fn request_count(&self) -> u64 {
        self.state.lock().request_count
    }

    fn decide_at(&self, state: &mut WindowState, now: u64) -> Decision {
        let window_start = now - now % self.window_nanos;

        // a backwards clock reading never rolls back to an older window
        if window_start > state.window_start {
            state.window_start = window_start;
            state.request_count = 0;
        }

        if state.request_count < self.request_threshold {
            state.request_count += 1;
            return Decision::admitted(self.request_threshold - state.request_count);
        }

        let retry_after = (self.request_threshold > 0).then(|| {
            let window_end = state.window_start.saturating_add(self.window_nanos);
            Duration::from_nanos(window_end.saturating_sub(now))
        });
        tracing::trace!(
            window_start = state.window_start,
            request_count = state.request_count,
            "fixed window rejected request"
        );
        Decision::rejected(0, retry_after)
    }
}

impl<C> AdmissionDecider for FixedWindowLimiter<C>
where
    C: Clock,
{
    fn decide(&self) -> Result<Decision, LimiterError> {
        let mut state = self.state.lock();
        // read under the lock so serialized decisions observe ordered timestamps
        let now = self.clock.now()?;
        Ok(self.decide_at(&mut state, now))
    }
}
