//! Configuration loading from environment.

use std::env;

use rates_client::{FRANKFURTER_URL, OPEN_ER_API_URL};
use remit_engine::engine::SEED_RATE;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub primary_fx_url: String,
    pub secondary_fx_url: String,
    pub base_currency: String,
    pub fee_usd: f64,
    pub seed_rate: f64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let primary_fx_url =
            lookup("REMIT_PRIMARY_FX_URL").unwrap_or_else(|| FRANKFURTER_URL.to_string());
        let secondary_fx_url =
            lookup("REMIT_SECONDARY_FX_URL").unwrap_or_else(|| OPEN_ER_API_URL.to_string());
        let base_currency = lookup("REMIT_BASE_CURRENCY").unwrap_or_else(|| "INR".to_string());

        let fee_usd: f64 = lookup("REMIT_FEE_USD")
            .unwrap_or_else(|| "0".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("REMIT_FEE_USD must be a number: {}", e))?;
        if !(fee_usd.is_finite() && fee_usd >= 0.0) {
            anyhow::bail!("REMIT_FEE_USD must not be negative");
        }

        let seed_rate: f64 = match lookup("REMIT_SEED_RATE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("REMIT_SEED_RATE must be a number: {}", e))?,
            None => SEED_RATE,
        };
        if !(seed_rate.is_finite() && seed_rate > 0.0) {
            anyhow::bail!("REMIT_SEED_RATE must be positive");
        }

        Ok(Self {
            primary_fx_url,
            secondary_fx_url,
            base_currency,
            fee_usd,
            seed_rate,
        })
    }
}
