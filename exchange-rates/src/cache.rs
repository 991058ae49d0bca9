//! Time-bounded memoisation of resolved rates.

use dashmap::DashMap;
use remit_types::RatePair;
use tracing::debug;

/// Ten minutes, in milliseconds.
pub const DEFAULT_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// Configuration for the rate cache.
#[derive(Debug, Clone, Copy)]
pub struct RateCacheConfig {
    /// How long an entry stays fresh after it was fetched.
    pub ttl_millis: i64,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl_millis: DEFAULT_TTL_MILLIS,
        }
    }
}

/// A cached rate and the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCacheEntry {
    pub pair: RatePair,
    pub rate: f64,
    pub fetched_at_millis: i64,
}

impl RateCacheEntry {
    /// Fresh while strictly younger than `ttl_millis`.
    pub fn is_fresh(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis - self.fetched_at_millis < ttl_millis
    }
}

/// Rate cache keyed by the ordered `(from, to)` pair.
///
/// Stale entries are kept and simply reported as misses; the key space is a
/// handful of currency codes so nothing is ever evicted.
#[derive(Debug, Default)]
pub struct RateCache {
    entries: DashMap<RatePair, RateCacheEntry>,
    config: RateCacheConfig,
}

impl RateCache {
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    pub fn with_config(config: RateCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> RateCacheConfig {
        self.config
    }

    /// Returns the stored entry regardless of age.
    pub fn get(&self, pair: &RatePair) -> Option<RateCacheEntry> {
        self.entries.get(pair).map(|entry| entry.value().clone())
    }

    /// Returns the entry only if it is still fresh at `now_millis`.
    pub fn get_fresh(&self, pair: &RatePair, now_millis: i64) -> Option<RateCacheEntry> {
        match self.get(pair) {
            Some(entry) if entry.is_fresh(now_millis, self.config.ttl_millis) => {
                debug!(pair = %pair, "Cache hit");
                Some(entry)
            }
            Some(_) => {
                debug!(pair = %pair, "Cache entry stale");
                None
            }
            None => {
                debug!(pair = %pair, "Cache miss");
                None
            }
        }
    }

    /// Stores (or replaces) the rate for `pair`.
    ///
    /// Non-positive or non-finite rates are ignored so every entry keeps
    /// `rate > 0`.
    pub fn put(&self, pair: RatePair, rate: f64, now_millis: i64) {
        if !(rate.is_finite() && rate > 0.0) {
            debug!(pair = %pair, rate, "Refusing to cache unusable rate");
            return;
        }
        let entry = RateCacheEntry {
            pair: pair.clone(),
            rate,
            fetched_at_millis: now_millis,
        };
        self.entries.insert(pair, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
