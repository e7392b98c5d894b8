// src/keyed.rs

// per-key registry: one limiter per caller key, with idle eviction

// dependencies
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::clock::{Clock, MonotonicClock};
use crate::config::LimiterConfig;
use crate::decider::{AdmissionDecider, Decision};
use crate::errors::LimiterError;
use crate::limiter::Limiter;

/// Registry holding one independent limiter per key.
/// K is the type used to identify callers (e.g., String, u64, etc.).
/// C is the clock type, defaulting to MonotonicClock; every key's limiter
/// receives a clone of it.
/// Keys never share state: each is limited exactly as a standalone limiter
/// built from the same config would be.
#[derive(Debug)]
pub struct KeyedLimiter<K, C = MonotonicClock>
where
    K: Hash + Eq + Clone,
    C: Clock + Clone,
{
    config: LimiterConfig,
    entries: DashMap<K, KeyEntry<C>>,
    clock: C,
}

#[derive(Debug)]
struct KeyEntry<C: Clock> {
    limiter: Limiter<C>,
    last_seen: AtomicU64,
}

impl<K, C> KeyedLimiter<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock + Clone,
{
    /// Create an empty registry; the config is validated once, up front.
    pub fn new(config: impl Into<LimiterConfig>, clock: C) -> Result<Self, LimiterError> {
        let config = config.into();
        config.validate()?;
        Ok(Self {
            config,
            entries: DashMap::new(),
            clock,
        })
    }

    /// Decide a unit-cost request for `key`, creating its limiter on first use.
    pub fn check(&self, key: K) -> Result<Decision, LimiterError> {
        let now = self.clock.now()?;

        if let Some(entry) = self.entries.get(&key) {
            entry.last_seen.fetch_max(now, Ordering::Relaxed);
            return entry.limiter.decide();
        }

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                let entry = entry.into_ref();
                entry.last_seen.fetch_max(now, Ordering::Relaxed);
                entry.limiter.decide()
            }
            Entry::Vacant(slot) => {
                let limiter = self.config.build(self.clock.clone())?;
                tracing::trace!("registered limiter for new key");
                let entry = slot.insert(KeyEntry {
                    limiter,
                    last_seen: AtomicU64::new(now),
                });
                entry.limiter.decide()
            }
        }
    }

    /// Decide a unit-cost request for `key`, reporting only admission.
    pub fn allow(&self, key: K) -> Result<bool, LimiterError> {
        self.check(key).map(|decision| decision.allowed)
    }

    /// Evict keys not seen within `max_idle`; returns how many were removed.
    pub fn cleanup_idle(&self, max_idle: Duration) -> Result<usize, LimiterError> {
        let now = self.clock.now()?;
        let max_idle_nanos = max_idle.as_nanos().min(u64::MAX as u128) as u64;
        let cutoff = now.saturating_sub(max_idle_nanos);

        let mut evicted = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.last_seen.load(Ordering::Relaxed) > cutoff;
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle keys");
        }
        Ok(evicted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}
