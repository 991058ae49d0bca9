//! Currency codes and the ordered pairs rates are keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RateError;

/// An ISO-4217-like currency identifier such as `USD` or `INR`.
///
/// Codes are trimmed and upper-cased on construction. The only validation
/// is that the code is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, rejecting empty input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, RateError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(RateError::InvalidCurrencyPair);
        }
        Ok(Self(code.to_uppercase()))
    }

    /// Indian Rupee, the default settlement currency.
    pub fn inr() -> Self {
        Self("INR".to_string())
    }

    /// US Dollar, the default send currency.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = RateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The session's currency pair.
///
/// Rates are always reported as "1 quote unit = R base units", i.e. the
/// rate is base-per-quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Settlement currency amounts are converted into.
    pub base: CurrencyCode,
    /// Currency the user sends from.
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// The lookup key for the base-per-quote rate: `quote -> base`.
    pub fn rate_pair(&self) -> RatePair {
        RatePair::new(self.quote.clone(), self.base.clone())
    }

    /// Returns true when base and quote are the same currency.
    pub fn is_degenerate(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Ordered `(from, to)` key for a rate lookup.
///
/// Not symmetric: `USD -> INR` and `INR -> USD` are distinct keys and no
/// reciprocal is ever derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatePair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl RatePair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    /// Builds a pair from raw codes, failing fast on empty input.
    pub fn parse(from: &str, to: &str) -> Result<Self, RateError> {
        Ok(Self::new(CurrencyCode::new(from)?, CurrencyCode::new(to)?))
    }

    /// Returns true when no conversion is needed.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for RatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.from, self.to)
    }
}
