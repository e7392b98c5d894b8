// src/lib.rs

//! # Flux Admission
//!
//! Constant-time admission control for request-handling servers. Three
//! interchangeable algorithms implement one [`AdmissionDecider`] contract:
//!
//! - [`FixedWindowLimiter`]: a counter per boundary-aligned window.
//! - [`TokenBucketLimiter`]: a continuously refilled, burst-tolerant token pool.
//! - [`LeakingBucketLimiter`]: a bounded FIFO drained at a fixed rate.
//!
//! Every limiter reads time from an injected [`Clock`] and serializes each
//! decision behind its own lock, so one instance may be shared across any
//! number of threads. Rejection is an ordinary outcome, never an error.
//!
//! ## Quick Example
//!
//! ```rust
//! use flux_admission::{AdmissionDecider, MonotonicClock, TokenBucketConfig, TokenBucketLimiter};
//!
//! let config = TokenBucketConfig::new(5, 1.0);
//! let limiter = TokenBucketLimiter::with_config(config, MonotonicClock::new()).unwrap();
//!
//! let decision = limiter.decide().unwrap();
//! if decision.allowed {
//!     println!("Request admitted, {} tokens left", decision.remaining);
//! } else {
//!     println!("Rate limited - retry after {:?}", decision.retry_after);
//! }
//! ```

// private modules
mod clock;
mod config;
mod decider;
mod errors;
mod fixed_window;
mod keyed;
mod leaking_bucket;
mod limiter;
mod token_bucket;

// public API exports
pub use clock::{Clock, ClockError, MonotonicClock};
pub use config::{FixedWindowConfig, LeakingBucketConfig, LimiterConfig, TokenBucketConfig};
pub use decider::{AdmissionDecider, Decision};
pub use errors::{ConfigError, LimiterError};
pub use fixed_window::FixedWindowLimiter;
pub use keyed::KeyedLimiter;
pub use leaking_bucket::LeakingBucketLimiter;
pub use limiter::Limiter;
pub use token_bucket::TokenBucketLimiter;
