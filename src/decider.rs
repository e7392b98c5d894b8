// src/decider.rs

// the shared decision contract implemented by every algorithm

// dependencies
use std::time::Duration;

use crate::errors::LimiterError;

/// Result of an admission decision with metadata for transport responses
/// (e.g. `Retry-After` and remaining-quota headers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request should be admitted
    pub allowed: bool,
    /// Slots or whole tokens left once this decision has been applied
    pub remaining: u64,
    /// Earliest wait after which a retry could be admitted, absent other traffic.
    /// `None` when admitted, or when no amount of waiting can admit the request.
    pub retry_after: Option<Duration>,
}

impl Decision {
    pub(crate) fn admitted(remaining: u64) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    pub(crate) fn rejected(remaining: u64, retry_after: Option<Duration>) -> Self {
        Self {
            allowed: false,
            remaining,
            retry_after,
        }
    }
}

/// Decide, in bounded time, whether a single request is admitted.
///
/// Implementations serialize their refill/drain/rollover step together with
/// the admit test, so concurrent callers sharing one instance never both
/// take the last slot. Calls never block waiting for capacity.
pub trait AdmissionDecider: Send + Sync {
    /// Decide a unit-cost request.
    fn decide(&self) -> Result<Decision, LimiterError>;

    /// Decide a unit-cost request, reporting only whether it was admitted.
    fn allow(&self) -> Result<bool, LimiterError> {
        self.decide().map(|decision| decision.allowed)
    }
}

impl<D: AdmissionDecider + ?Sized> AdmissionDecider for std::sync::Arc<D> {
    fn decide(&self) -> Result<Decision, LimiterError> {
        (**self).decide()
    }
}
