//! Exchange Rate Resolution
//!
//! Resolves base-per-quote exchange rates through an ordered chain of
//! providers, memoising successful lookups in a time-bounded cache.
//!
//! Resolution order for `from -> to`:
//! 1. identical codes resolve to `1.0` without touching any provider
//! 2. a fresh cache entry (younger than the TTL, ten minutes by default)
//! 3. each provider in priority order, typically two HTTP sources
//! 4. the compile-time approximation table ([`StaticRateProvider`])
//!
//! The first usable value (finite and positive) is cached and returned. When
//! every source fails the caller gets [`RateError::RateUnavailable`].
//!
//! # Example
//! ```
//! use exchange_rates::RateResolver;
//!
//! # tokio_test_block_on(async {
//! let resolver = RateResolver::builder().with_static_fallback().build();
//! let rate = resolver.resolve("USD", "INR").await.unwrap();
//! assert_eq!(rate, 88.1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```
//!
//! [`RateError::RateUnavailable`]: remit_types::RateError::RateUnavailable

pub mod cache;
pub mod resolver;
pub mod static_table;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use cache::{RateCache, RateCacheConfig, RateCacheEntry};
pub use resolver::{RateResolver, RateResolverBuilder, RateSource, ResolvedRate};
pub use static_table::{KnownCurrency, StaticRateProvider, approximate_rate};
