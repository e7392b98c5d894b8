// tests/limiter/error_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use flux_admission::{
        AdmissionDecider, ClockError, FixedWindowConfig, FixedWindowLimiter, KeyedLimiter,
        LeakingBucketConfig, LeakingBucketLimiter, LimiterError, TokenBucketConfig,
        TokenBucketLimiter,
    };
    use std::time::Duration;

    #[test]
    fn clock_error_propagates_from_decision() {
        let clock = TestClock::new(0.0);
        let config = FixedWindowConfig::new(Duration::from_secs(1), 5);
        let limiter = FixedWindowLimiter::with_config(config, clock.clone()).unwrap();

        clock.fail_next_call();
        match limiter.allow() {
            Err(LimiterError::Clock(ClockError::Unavailable)) => {} // Expected
            other => panic!("Expected clock error, got: {:?}", other),
        }
    }

    #[test]
    fn clock_error_leaves_token_bucket_untouched() {
        let clock = TestClock::new(0.0);
        let config = TokenBucketConfig::new(1, 0.0);
        let limiter = TokenBucketLimiter::with_config(config, clock.clone()).unwrap();

        clock.fail_next_call();
        assert!(limiter.allow().is_err());

        // the single token was not consumed by the failed call
        assert!(limiter.allow().unwrap());
        assert!(!limiter.allow().unwrap());
    }

    #[test]
    fn clock_error_leaves_queue_untouched() {
        let clock = TestClock::new(0.0);
        let config = LeakingBucketConfig::new(1, 0.0);
        let limiter = LeakingBucketLimiter::with_config(config, clock.clone()).unwrap();

        clock.fail_next_call();
        assert!(limiter.allow().is_err());
        assert_eq!(limiter.queue_len().unwrap(), 0);
    }

    #[test]
    fn construction_fails_when_clock_fails() {
        let clock = TestClock::new(0.0);

        clock.fail_next_call();
        let result = TokenBucketLimiter::with_config(TokenBucketConfig::new(1, 1.0), clock.clone());
        assert!(matches!(result, Err(LimiterError::Clock(_))));

        clock.fail_next_call();
        let result =
            LeakingBucketLimiter::with_config(LeakingBucketConfig::new(1, 1.0), clock.clone());
        assert!(matches!(result, Err(LimiterError::Clock(_))));
    }

    #[test]
    fn registry_recovers_after_clock_failure() {
        let clock = TestClock::new(0.0);
        let registry = KeyedLimiter::new(TokenBucketConfig::new(2, 1.0), clock.clone()).unwrap();

        clock.fail_next_call();
        assert!(registry.check("client1").is_err());
        assert!(registry.is_empty());

        assert!(registry.allow("client1").unwrap());
        assert_eq!(registry.len(), 1);

        clock.fail_next_call();
        assert!(registry.cleanup_idle(Duration::ZERO).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn error_display_formatting() {
        let clock = TestClock::new(0.0);
        let config = FixedWindowConfig::new(Duration::from_secs(1), 1);
        let limiter = FixedWindowLimiter::with_config(config, clock.clone()).unwrap();

        clock.fail_next_call();
        let error = limiter.decide().unwrap_err();
        assert!(error.to_string().to_lowercase().contains("clock"));
    }
}
