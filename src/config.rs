// src/config.rs

//! Configuration types for the admission limiters

// dependencies
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::errors::{ConfigError, LimiterError};
use crate::fixed_window::FixedWindowLimiter;
use crate::leaking_bucket::LeakingBucketLimiter;
use crate::limiter::Limiter;
use crate::token_bucket::TokenBucketLimiter;

// rates are requests or tokens per second; NaN and infinities are rejected
fn validate_rate(rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { rate })
    }
}

/// Configuration for a fixed window counter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedWindowConfig {
    pub(crate) window_size: Duration,
    pub(crate) request_threshold: u64,
}

impl FixedWindowConfig {
    /// Create a new configuration admitting `request_threshold` requests per `window_size`
    pub fn new(window_size: Duration, request_threshold: u64) -> Self {
        Self {
            window_size,
            request_threshold,
        }
    }

    /// Builder-style: set window size
    pub fn window_size(mut self, window_size: Duration) -> Self {
        self.window_size = window_size;
        self
    }

    /// Builder-style: set request threshold
    pub fn request_threshold(mut self, request_threshold: u64) -> Self {
        self.request_threshold = request_threshold;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // sub-nanosecond windows truncate to zero on the nanosecond timeline
        if self.window_size.as_nanos() == 0 {
            return Err(ConfigError::InvalidWindowSize);
        }
        Ok(())
    }
}

/// Configuration for a token bucket
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenBucketConfig {
    pub(crate) capacity: u64,
    pub(crate) refill_rate: f64,
}

impl TokenBucketConfig {
    /// Create a new configuration with capacity and refill rate (tokens per second)
    pub fn new(capacity: u64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
        }
    }

    /// Builder-style: set capacity
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style: set refill rate
    pub fn refill_rate(mut self, refill_rate: f64) -> Self {
        self.refill_rate = refill_rate;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rate(self.refill_rate)
    }
}

/// Configuration for a leaking bucket
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LeakingBucketConfig {
    pub(crate) capacity: u64,
    pub(crate) outflow_rate: f64,
}

impl LeakingBucketConfig {
    /// Create a new configuration with queue capacity and outflow rate (requests per second)
    pub fn new(capacity: u64, outflow_rate: f64) -> Self {
        Self {
            capacity,
            outflow_rate,
        }
    }

    /// Builder-style: set capacity
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style: set outflow rate
    pub fn outflow_rate(mut self, outflow_rate: f64) -> Self {
        self.outflow_rate = outflow_rate;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rate(self.outflow_rate)
    }
}

/// Configuration for any of the supported algorithms.
///
/// Use this when the strategy is chosen at runtime, for example from a
/// configuration file; [`build`](LimiterConfig::build) yields a [`Limiter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", rename_all = "snake_case"))]
pub enum LimiterConfig {
    FixedWindow(FixedWindowConfig),
    TokenBucket(TokenBucketConfig),
    LeakingBucket(LeakingBucketConfig),
}

impl LimiterConfig {
    /// Validate the wrapped configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            LimiterConfig::FixedWindow(config) => config.validate(),
            LimiterConfig::TokenBucket(config) => config.validate(),
            LimiterConfig::LeakingBucket(config) => config.validate(),
        }
    }

    /// Build the configured limiter on top of `clock`
    pub fn build<C: Clock>(&self, clock: C) -> Result<Limiter<C>, LimiterError> {
        let limiter = match self {
            LimiterConfig::FixedWindow(config) => {
                Limiter::FixedWindow(FixedWindowLimiter::with_config(config.clone(), clock)?)
            }
            LimiterConfig::TokenBucket(config) => {
                Limiter::TokenBucket(TokenBucketLimiter::with_config(config.clone(), clock)?)
            }
            LimiterConfig::LeakingBucket(config) => {
                Limiter::LeakingBucket(LeakingBucketLimiter::with_config(config.clone(), clock)?)
            }
        };
        Ok(limiter)
    }
}

impl From<FixedWindowConfig> for LimiterConfig {
    fn from(config: FixedWindowConfig) -> Self {
        LimiterConfig::FixedWindow(config)
    }
}

impl From<TokenBucketConfig> for LimiterConfig {
    fn from(config: TokenBucketConfig) -> Self {
        LimiterConfig::TokenBucket(config)
    }
}

impl From<LeakingBucketConfig> for LimiterConfig {
    fn from(config: LeakingBucketConfig) -> Self {
        LimiterConfig::LeakingBucket(config)
    }
}
