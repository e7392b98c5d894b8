// src/limiter.rs

// runtime-selected limiter: one enum over the three algorithms

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::decider::{AdmissionDecider, Decision};
use crate::errors::LimiterError;
use crate::fixed_window::FixedWindowLimiter;
use crate::leaking_bucket::LeakingBucketLimiter;
use crate::token_bucket::TokenBucketLimiter;

/// A limiter whose algorithm is picked at runtime, usually built from a
/// [`LimiterConfig`](crate::LimiterConfig).
#[derive(Debug)]
pub enum Limiter<C = MonotonicClock>
where
    C: Clock,
{
    FixedWindow(FixedWindowLimiter<C>),
    TokenBucket(TokenBucketLimiter<C>),
    LeakingBucket(LeakingBucketLimiter<C>),
}

impl<C> AdmissionDecider for Limiter<C>
where
    C: Clock,
{
    fn decide(&self) -> Result<Decision, LimiterError> {
        match self {
            Limiter::FixedWindow(limiter) => limiter.decide(),
            Limiter::TokenBucket(limiter) => limiter.decide(),
            Limiter::LeakingBucket(limiter) => limiter.decide(),
        }
    }
}

impl<C: Clock> From<FixedWindowLimiter<C>> for Limiter<C> {
    fn from(limiter: FixedWindowLimiter<C>) -> Self {
        Limiter::FixedWindow(limiter)
    }
}

impl<C: Clock> From<TokenBucketLimiter<C>> for Limiter<C> {
    fn from(limiter: TokenBucketLimiter<C>) -> Self {
        Limiter::TokenBucket(limiter)
    }
}

impl<C: Clock> From<LeakingBucketLimiter<C>> for Limiter<C> {
    fn from(limiter: LeakingBucketLimiter<C>) -> Self {
        Limiter::LeakingBucket(limiter)
    }
}
