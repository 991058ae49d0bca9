//! Error types for rate resolution, the engine and booking.

use crate::domain::RatePair;

/// Rate resolution errors.
///
/// Only `InvalidCurrencyPair` and `RateUnavailable` leave the provider chain;
/// the rest describe why a single provider was skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Invalid currency pair: currency codes must not be empty")]
    InvalidCurrencyPair,

    #[error("HTTP error from {provider}: {message}")]
    Http { provider: String, message: String },

    #[error("{provider} responded with status {status}")]
    Status { provider: String, status: u16 },

    #[error("Malformed response from {provider}: {reason}")]
    MalformedResponse { provider: String, reason: String },

    #[error("{provider} has no rate for {pair}")]
    MissingRate { provider: String, pair: RatePair },

    #[error("{provider} returned unusable rate {rate}")]
    InvalidRate { provider: String, rate: f64 },

    #[error("Rate unavailable for {0}")]
    RateUnavailable(RatePair),
}

/// Conversion engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid currency pair: currency codes must not be empty")]
    InvalidCurrencyPair,

    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Booking submission errors, surfaced to the user before any payload is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),
}

impl BookingError {
    /// The individual user-facing messages.
    pub fn messages(&self) -> &[String] {
        match self {
            BookingError::Validation(messages) => messages,
        }
    }
}
