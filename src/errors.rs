// src/errors.rs

// error handling for the admission limiters

// dependencies
use thiserror::Error;

use crate::clock::ClockError;

/// Construction-time validation failures.
///
/// Zero thresholds, capacities and rates are valid degenerate configurations
/// and never produce this error.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window size must be greater than zero")]
    InvalidWindowSize,
    #[error("rate must be finite and non-negative, got {rate}")]
    InvalidRate { rate: f64 },
}

/// Error type returned by limiter construction and decisions.
///
/// A rejected request is not an error; see [`Decision::allowed`](crate::Decision).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimiterError {
    #[error("invalid limiter configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("clock error occurred: {0}")]
    Clock(#[from] ClockError),
}
