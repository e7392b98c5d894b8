// src/token_bucket.rs

// token bucket: a continuously refilled pool of real-valued tokens

// dependencies
use parking_lot::Mutex;

use crate::clock::{Clock, MonotonicClock, NANOS_PER_SEC, ceil_duration};
use crate::config::TokenBucketConfig;
use crate::decider::{AdmissionDecider, Decision};
use crate::errors::LimiterError;

/// Token bucket limiter.
///
/// The bucket starts full at `capacity` tokens and refills continuously at
/// `refill_rate` tokens per second, saturating at `capacity`. Tokens are kept
/// as `f64` so that refill between closely spaced calls is never truncated
/// away. Each call refills first and always moves the refill mark to the
/// current reading, admitted or not.
///
/// A `refill_rate` of zero freezes the bucket at its current level.
#[derive(Debug)]
pub struct TokenBucketLimiter<C = MonotonicClock>
where
    C: Clock,
{
    capacity: u64,
    refill_rate: f64,
    state: Mutex<BucketState>,
    clock: C,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: u64,
}

impl<C> TokenBucketLimiter<C>
where
    C: Clock,
{
    /// Create a limiter from a config object; the refill mark starts at the
    /// clock's current reading.
    pub fn with_config(config: TokenBucketConfig, clock: C) -> Result<Self, LimiterError> {
        config.validate()?;
        let last_refill = clock.now()?;

        tracing::debug!(
            capacity = config.capacity,
            refill_rate = config.refill_rate,
            "token bucket limiter created"
        );

        Ok(Self {
            capacity: config.capacity,
            refill_rate: config.refill_rate,
            state: Mutex::new(BucketState {
                tokens: config.capacity as f64,
                last_refill,
            }),
            clock,
        })
    }

    // accessor method to return the bucket capacity
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    // accessor method to return the refill rate in tokens per second
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Tokens available right now, after applying refill up to the current reading.
    pub fn available(&self) -> Result<f64, LimiterError> {
        let mut state = self.state.lock();
        let now = self.clock.now()?;
        self.refill(&mut state, now);
        Ok(state.tokens)
    }

    /// Decide a request that needs `cost` tokens.
    ///
    /// A zero-cost request is always admitted; it still refills the bucket.
    pub fn decide_cost(&self, cost: u64) -> Result<Decision, LimiterError> {
        let mut state = self.state.lock();
        let now = self.clock.now()?;
        self.refill(&mut state, now);

        let needed = cost as f64;
        if state.tokens >= needed {
            state.tokens -= needed;
            return Ok(Decision::admitted(state.tokens.floor() as u64));
        }

        // waiting only helps when the bucket refills and can ever hold `cost`
        let retry_after = (self.refill_rate > 0.0 && cost <= self.capacity)
            .then(|| ceil_duration((needed - state.tokens) / self.refill_rate));
        tracing::trace!(cost, tokens = state.tokens, "token bucket rejected request");
        Ok(Decision::rejected(state.tokens.floor() as u64, retry_after))
    }

    /// Decide a request that needs `cost` tokens, reporting only admission.
    pub fn allow_cost(&self, cost: u64) -> Result<bool, LimiterError> {
        self.decide_cost(cost).map(|decision| decision.allowed)
    }

    fn refill(&self, state: &mut BucketState, now: u64) {
        let elapsed = now.saturating_sub(state.last_refill);
        if elapsed > 0 {
            let added = elapsed as f64 / NANOS_PER_SEC * self.refill_rate;
            state.tokens = (state.tokens + added).min(self.capacity as f64);
            state.last_refill = now;
        }
    }
}

impl<C> AdmissionDecider for TokenBucketLimiter<C>
where
    C: Clock,
{
    fn decide(&self) -> Result<Decision, LimiterError> {
        self.decide_cost(1)
    }
}
