//! Ordered provider chain with cache-first lookup.

use std::fmt;
use std::sync::Arc;

use remit_types::{Clock, RateError, RatePair, RateProvider, SystemClock};
use tracing::{debug, error, instrument, warn};

use crate::cache::{RateCache, RateCacheConfig};
use crate::static_table::StaticRateProvider;

/// Where a resolved rate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    /// `from == to`, no lookup performed.
    Identity,
    /// Fresh cache entry.
    Cache,
    /// Named provider from the chain.
    Provider(String),
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Identity => f.write_str("identity"),
            RateSource::Cache => f.write_str("cache"),
            RateSource::Provider(name) => f.write_str(name),
        }
    }
}

/// A successfully resolved rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    pub pair: RatePair,
    pub rate: f64,
    pub source: RateSource,
}

/// Resolves rates through the cache and then each provider in order.
pub struct RateResolver {
    providers: Vec<Arc<dyn RateProvider>>,
    cache: RateCache,
    clock: Arc<dyn Clock>,
}

impl RateResolver {
    pub fn builder() -> RateResolverBuilder {
        RateResolverBuilder::default()
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Names of the providers in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolves units of `to` per unit of `from`.
    ///
    /// Fails fast with `InvalidCurrencyPair` on empty codes, and with
    /// `RateUnavailable` only once every provider has failed.
    pub async fn resolve(&self, from: &str, to: &str) -> Result<f64, RateError> {
        let pair = RatePair::parse(from, to)?;
        self.resolve_pair(&pair).await.map(|resolved| resolved.rate)
    }

    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn resolve_pair(&self, pair: &RatePair) -> Result<ResolvedRate, RateError> {
        if pair.is_identity() {
            return Ok(ResolvedRate {
                pair: pair.clone(),
                rate: 1.0,
                source: RateSource::Identity,
            });
        }

        let now = self.clock.now_millis();
        if let Some(entry) = self.cache.get_fresh(pair, now) {
            return Ok(ResolvedRate {
                pair: pair.clone(),
                rate: entry.rate,
                source: RateSource::Cache,
            });
        }

        for provider in &self.providers {
            let result = provider
                .get_rate(pair)
                .await
                .and_then(|rate| usable_rate(provider.name(), rate));

            match result {
                Ok(rate) => {
                    debug!(provider = provider.name(), rate, "Got rate from provider");
                    self.cache.put(pair.clone(), rate, now);
                    return Ok(ResolvedRate {
                        pair: pair.clone(),
                        rate,
                        source: RateSource::Provider(provider.name().to_string()),
                    });
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed to return rate"
                    );
                }
            }
        }

        error!("Every rate provider failed");
        Err(RateError::RateUnavailable(pair.clone()))
    }
}

fn usable_rate(provider: &str, rate: f64) -> Result<f64, RateError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RateError::InvalidRate {
            provider: provider.to_string(),
            rate,
        })
    }
}

/// Builder for [`RateResolver`].
#[derive(Default)]
pub struct RateResolverBuilder {
    providers: Vec<Arc<dyn RateProvider>>,
    cache_config: RateCacheConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl RateResolverBuilder {
    /// Appends a provider; earlier providers take priority.
    pub fn provider(mut self, provider: Arc<dyn RateProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Appends the compile-time approximation table.
    pub fn with_static_fallback(self) -> Self {
        self.provider(Arc::new(StaticRateProvider))
    }

    pub fn cache_config(mut self, config: RateCacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> RateResolver {
        RateResolver {
            providers: self.providers,
            cache: RateCache::with_config(self.cache_config),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        }
    }
}
