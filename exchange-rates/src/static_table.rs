//! Compile-time approximation table, the last resort of the provider chain.
//!
//! Currencies are defined declaratively with a macro that generates the
//! `KnownCurrency` enum, its metadata and the approximate rate lookup.
//!
//! # Adding a Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     JPY => ("JPY", "¥", "Japanese Yen") { INR: 0.59 },
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use remit_types::{RateError, RatePair, RateProvider};
use tracing::debug;

/// Macro to define currencies together with their approximate outbound rates.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "SYMBOL", "display name") { TARGET: rate, ... },
/// }
/// ```
/// Every `TARGET` must itself be a defined currency.
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $display:literal)
                { $($target:ident : $rate:expr),* $(,)? }
        ),* $(,)?
    ) => {
        /// Currencies known to the approximation table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KnownCurrency {
            $($name),*
        }

        impl KnownCurrency {
            pub fn code(&self) -> &'static str {
                match self {
                    $(KnownCurrency::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(KnownCurrency::$name => $symbol),*
                }
            }

            pub fn display_name(&self) -> &'static str {
                match self {
                    $(KnownCurrency::$name => $display),*
                }
            }

            pub fn all() -> &'static [KnownCurrency] {
                &[$(KnownCurrency::$name),*]
            }

            /// Approximate units of `to` per unit of `self`, if tabulated.
            pub fn approximate_rate(&self, to: KnownCurrency) -> Option<f64> {
                match self {
                    $(
                        KnownCurrency::$name => match to {
                            $(KnownCurrency::$target => Some($rate),)*
                            #[allow(unreachable_patterns)]
                            _ => None,
                        },
                    )*
                }
            }
        }

        impl fmt::Display for KnownCurrency {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for KnownCurrency {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(KnownCurrency::$name),)*
                    _ => Err(format!("Unknown currency: {}", s)),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - INR anchored approximations
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", "US Dollar") { INR: 88.1, EUR: 0.92, GBP: 0.78 },
    EUR => ("EUR", "€", "Euro") { INR: 95.5, USD: 1.09 },
    GBP => ("GBP", "£", "British Pound") { INR: 111.0, USD: 1.28 },
    AUD => ("AUD", "A$", "Australian Dollar") { INR: 58.0 },
    CAD => ("CAD", "C$", "Canadian Dollar") { INR: 64.0 },
    INR => ("INR", "₹", "Indian Rupee") {},
}

/// Looks up the tabulated approximation for an ordered pair.
///
/// No reciprocal is derived: `INR -> USD` is absent even though `USD -> INR`
/// is present.
pub fn approximate_rate(pair: &RatePair) -> Option<f64> {
    let from: KnownCurrency = pair.from.as_str().parse().ok()?;
    let to: KnownCurrency = pair.to.as_str().parse().ok()?;
    from.approximate_rate(to)
}

/// Provider serving the approximation table.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticRateProvider;

impl StaticRateProvider {
    pub const NAME: &'static str = "static";
}

#[async_trait::async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_rate(&self, pair: &RatePair) -> Result<f64, RateError> {
        match approximate_rate(pair) {
            Some(rate) => {
                debug!(pair = %pair, rate, "Using static approximation");
                Ok(rate)
            }
            None => Err(RateError::MissingRate {
                provider: Self::NAME.to_string(),
                pair: pair.clone(),
            }),
        }
    }
}
