//! Test doubles: a controllable clock and an in-memory rate provider.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use remit_types::{Clock, RateError, RatePair, RateProvider};

/// Clock whose time only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// In-memory provider with per-pair rates and delays.
pub struct MockRateProvider {
    name: String,
    rates: DashMap<RatePair, f64>,
    delays: DashMap<RatePair, Duration>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockRateProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
            delays: DashMap::new(),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_rate(&self, pair: RatePair, rate: f64) {
        self.rates.insert(pair, rate);
    }

    /// Makes lookups of `pair` sleep before answering.
    pub fn set_delay(&self, pair: RatePair, delay: Duration) {
        self.delays.insert(pair, delay);
    }

    /// Makes every lookup fail as if the service were down.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    /// Number of lookups received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_rate(&self, pair: &RatePair) -> Result<f64, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.get(pair).map(|d| *d.value());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(RateError::Http {
                provider: self.name.clone(),
                message: "connection refused".into(),
            });
        }

        self.rates
            .get(pair)
            .map(|rate| *rate.value())
            .ok_or_else(|| RateError::MissingRate {
                provider: self.name.clone(),
                pair: pair.clone(),
            })
    }
}
