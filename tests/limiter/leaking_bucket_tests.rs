// tests/limiter/leaking_bucket_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use flux_admission::{AdmissionDecider, LeakingBucketConfig, LeakingBucketLimiter};

    fn limiter(capacity: u64, rate: f64, clock: &TestClock) -> LeakingBucketLimiter<TestClock> {
        LeakingBucketLimiter::with_config(LeakingBucketConfig::new(capacity, rate), clock.clone())
            .unwrap()
    }

    fn fill(limiter: &LeakingBucketLimiter<TestClock>) {
        while limiter.allow().unwrap() {}
    }

    #[test]
    fn three_slot_scenario() {
        let clock = TestClock::new(0.0);
        let limiter = limiter(3, 1.0, &clock);

        assert!(limiter.allow().unwrap());
        assert!(limiter.allow().unwrap());
        assert!(limiter.allow().unwrap());
        assert!(!limiter.allow().unwrap());

        clock.advance(1.0);
        assert!(limiter.allow().unwrap());
    }

    #[test]
    fn queue_never_exceeds_capacity() {
        let clock = TestClock::new(0.0);
        let limiter = limiter(4, 3.0, &clock);

        for step in 0..50 {
            let _ = limiter.allow().unwrap();
            let _ = limiter.allow().unwrap();
            assert!(limiter.queue_len().unwrap() <= 4, "step {}", step);
            clock.advance(0.1);
        }
    }

    #[test]
    fn drained_count_frees_matching_slots() {
        let clock = TestClock::new(0.0);
        let limiter = limiter(10, 2.0, &clock);
        fill(&limiter);

        // 1.5s at 2/s drains three entries
        clock.advance(1.5);
        assert_eq!(limiter.queue_len().unwrap(), 7);

        let admitted = (0..10).filter(|_| limiter.allow().unwrap()).count();
        assert_eq!(admitted, 3);
    }

    #[test]
    fn two_half_intervals_drain_like_one_full_interval() {
        let halves_clock = TestClock::new(0.0);
        let halves = limiter(5, 1.0, &halves_clock);
        fill(&halves);
        halves_clock.advance(0.5);
        assert!(!halves.allow().unwrap());
        halves_clock.advance(0.5);
        assert_eq!(halves.queue_len().unwrap(), 4);

        let full_clock = TestClock::new(0.0);
        let full = limiter(5, 1.0, &full_clock);
        fill(&full);
        full_clock.advance(1.0);
        assert_eq!(full.queue_len().unwrap(), 4);
    }

    #[test]
    fn fractional_leftover_carries_across_drains() {
        let clock = TestClock::new(0.0);
        let limiter = limiter(10, 1.0, &clock);
        fill(&limiter);

        // 1.6 + 1.6 = 3.2s drains three, not two
        clock.advance(1.6);
        assert_eq!(limiter.queue_len().unwrap(), 9);
        clock.advance(1.6);
        assert_eq!(limiter.queue_len().unwrap(), 7);
    }

    #[test]
    fn steady_arrivals_at_outflow_rate_are_admitted() {
        let clock = TestClock::new(0.0);
        let limiter = limiter(1, 4.0, &clock);

        for _ in 0..20 {
            assert!(limiter.allow().unwrap());
            clock.advance(0.25);
        }
    }

    // first nanosecond at or after the k-th drain interval completes
    fn interval_boundary(k: u64, rate: u64) -> u64 {
        (k * 1_000_000_000).div_ceil(rate)
    }

    #[test]
    fn sub_nanosecond_intervals_drain_exactly_at_each_boundary() {
        let rate = 3_000;
        let steps = 9_000;
        let clock = TestClock::at_nanos(0);
        let limiter = limiter(steps, rate as f64, &clock);
        fill(&limiter);

        for k in 1..=steps {
            clock.set_nanos(interval_boundary(k, rate));
            let drained = steps - limiter.queue_len().unwrap() as u64;
            assert_eq!(drained, k, "after boundary {}", k);
        }

        // total drained equals floor(elapsed * rate)
        let ideal = (clock.nanos() as u128 * rate as u128 / 1_000_000_000) as u64;
        assert_eq!(steps - limiter.queue_len().unwrap() as u64, ideal);
    }

    #[test]
    fn half_interval_pairs_match_full_intervals_at_fractional_rate() {
        let rate = 3_000;
        let intervals = 3_000;

        let halves_clock = TestClock::at_nanos(0);
        let halves = limiter(2 * intervals, rate as f64, &halves_clock);
        fill(&halves);
        let full_clock = TestClock::at_nanos(0);
        let full = limiter(2 * intervals, rate as f64, &full_clock);
        fill(&full);

        for k in 1..=intervals {
            // half-interval boundaries fall at j / (2 * rate) seconds
            halves_clock.set_nanos(interval_boundary(2 * k - 1, 2 * rate));
            assert_eq!(halves.queue_len().unwrap() as u64, 2 * intervals - (k - 1));
            halves_clock.set_nanos(interval_boundary(2 * k, 2 * rate));

            full_clock.set_nanos(interval_boundary(k, rate));
            assert_eq!(halves_clock.nanos(), full_clock.nanos());
            assert_eq!(halves.queue_len().unwrap(), full.queue_len().unwrap());
            assert_eq!(full.queue_len().unwrap() as u64, 2 * intervals - k);
        }
    }

    #[test]
    fn drain_count_stays_exact_when_queue_outlives_many_intervals() {
        let rate = 300_000;
        let clock = TestClock::at_nanos(0);
        let limiter = limiter(1_000_000, rate as f64, &clock);
        for _ in 0..400_000 {
            assert!(limiter.allow().unwrap());
        }

        // one second in strides of seven intervals ends exactly at 300_000
        let mut k = 0;
        while k < rate {
            k = (k + 7).min(rate);
            clock.set_nanos(interval_boundary(k, rate));
            let _ = limiter.queue_len().unwrap();
        }
        assert_eq!(limiter.queue_len().unwrap(), 100_000);
    }
}
