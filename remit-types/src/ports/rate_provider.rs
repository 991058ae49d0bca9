//! Exchange rate provider port.
//!
//! Implementations can be HTTP clients, static tables, mock providers, etc.

use crate::domain::RatePair;
use crate::error::RateError;

/// Port trait for a single source of exchange rates.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Get the exchange rate for `pair`.
    /// Returns how many units of `pair.to` you get for 1 unit of `pair.from`.
    async fn get_rate(&self, pair: &RatePair) -> Result<f64, RateError>;
}
