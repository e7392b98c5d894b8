// src/leaking_bucket.rs

// leaking bucket: a bounded FIFO drained at a fixed outflow rate

// dependencies
use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::{Clock, MonotonicClock, NANOS_PER_SEC};
use crate::config::LeakingBucketConfig;
use crate::decider::{AdmissionDecider, Decision};
use crate::errors::LimiterError;

// upper bound on the queue allocation made up front
const PREALLOCATED_SLOTS: u64 = 1024;

/// Leaking bucket limiter.
///
/// Admitted requests occupy one slot each in a FIFO of at most `capacity`
/// entries. The queue drains `outflow_rate` entries per second: each call
/// first removes `floor(elapsed × outflow_rate)` entries, then admits if a
/// slot is free.
///
/// The drain mark advances by whole drain intervals only, never to the
/// current reading, so partial progress toward the next drain carries over
/// between calls. The mark is kept as an anchor plus a count of elapsed
/// intervals, so intervals that are not a whole number of nanoseconds never
/// round drain time into or out of the schedule. An `outflow_rate` of zero never drains; the bucket fills
/// once and rejects until [`clear`](LeakingBucketLimiter::clear) is called.
#[derive(Debug)]
pub struct LeakingBucketLimiter<C = MonotonicClock>
where
    C: Clock,
{
    capacity: u64,
    outflow_rate: f64,
    state: Mutex<QueueState>,
    clock: C,
}

#[derive(Debug)]
struct QueueState {
    // enqueue timestamps; only the length drives admission
    queue: VecDeque<u64>,
    // drain mark = drain_anchor + drained_intervals / outflow_rate
    drain_anchor: u64,
    drained_intervals: u64,
}

impl<C> LeakingBucketLimiter<C>
where
    C: Clock,
{
    /// Create a limiter from a config object; the drain mark starts at the
    /// clock's current reading.
    pub fn with_config(config: LeakingBucketConfig, clock: C) -> Result<Self, LimiterError> {
        config.validate()?;
        let drain_anchor = clock.now()?;

        tracing::debug!(
            capacity = config.capacity,
            outflow_rate = config.outflow_rate,
            "leaking bucket limiter created"
        );

        Ok(Self {
            capacity: config.capacity,
            outflow_rate: config.outflow_rate,
            state: Mutex::new(QueueState {
                queue: VecDeque::with_capacity(config.capacity.min(PREALLOCATED_SLOTS) as usize),
                drain_anchor,
                drained_intervals: 0,
            }),
            clock,
        })
    }

    // accessor method to return the queue capacity
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    // accessor method to return the outflow rate in requests per second
    pub fn outflow_rate(&self) -> f64 {
        self.outflow_rate
    }

    /// Queued requests right now, after draining up to the current reading.
    pub fn queue_len(&self) -> Result<usize, LimiterError> {
        let mut state = self.state.lock();
        let now = self.clock.now()?;
        self.drain(&mut state, now);
        Ok(state.queue.len())
    }

    /// Drop every queued request. The drain schedule is left untouched.
    pub fn clear(&self) {
        self.state.lock().queue.clear();
    }

    fn drain(&self, state: &mut QueueState, now: u64) {
        if self.outflow_rate == 0.0 {
            return;
        }
        // intervals due since the anchor, counting those that found the queue empty
        let elapsed = now.saturating_sub(state.drain_anchor);
        let due = (elapsed as f64 * self.outflow_rate / NANOS_PER_SEC).floor() as u64;
        if due <= state.drained_intervals {
            return;
        }

        let intervals = due - state.drained_intervals;
        let popped = intervals.min(state.queue.len() as u64) as usize;
        state.queue.drain(..popped);
        state.drained_intervals = due;
    }

    // first instant at which the next interval completes
    fn next_drain_at(&self, state: &QueueState) -> u64 {
        let next = state.drained_intervals.saturating_add(1) as f64;
        let offset = (next * NANOS_PER_SEC / self.outflow_rate).ceil() as u64;
        state.drain_anchor.saturating_add(offset)
    }

    fn retry_after(&self, state: &QueueState, now: u64) -> Option<Duration> {
        if self.outflow_rate == 0.0 || self.capacity == 0 {
            return None;
        }
        let wait = self.next_drain_at(state).saturating_sub(now);
        Some(Duration::from_nanos(wait))
    }
}

impl<C> AdmissionDecider for LeakingBucketLimiter<C>
where
    C: Clock,
{
    fn decide(&self) -> Result<Decision, LimiterError> {
        let mut state = self.state.lock();
        let now = self.clock.now()?;
        self.drain(&mut state, now);

        let queued = state.queue.len() as u64;
        if queued < self.capacity {
            state.queue.push_back(now);
            return Ok(Decision::admitted(self.capacity - queued - 1));
        }

        tracing::trace!(queued, "leaking bucket rejected request");
        Ok(Decision::rejected(0, self.retry_after(&state, now)))
    }
}
