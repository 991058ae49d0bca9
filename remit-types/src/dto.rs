//! Data Transfer Objects for the booking confirmation payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CurrencyCode, Payer};

// ─────────────────────────────────────────────────────────────────────────────
// Booking DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A value tagged with the currency it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountValue {
    pub value: f64,
    pub currency: CurrencyCode,
}

impl AmountValue {
    pub fn new(value: f64, currency: CurrencyCode) -> Self {
        Self { value, currency }
    }
}

/// Rate the booking was quoted at, with the label the user saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateQuote {
    pub base_per_quote: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFees {
    pub bank_fee_usd: f64,
    /// Fee converted to the base currency, rounded to whole units.
    pub bank_fee_in_base: f64,
    pub payer: Payer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTotals {
    /// Rounded to two decimals.
    pub total_payable_in_base: f64,
    /// Rounded to four decimals.
    pub effective_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingMeta {
    pub ts: DateTime<Utc>,
}

/// Payload handed to the order backend once validation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub amount_to_be_sent: AmountValue,
    pub amount_in_base: AmountValue,
    pub receiving_amount: AmountValue,
    pub exchange_rate: ExchangeRateQuote,
    pub fees: BookingFees,
    pub totals: BookingTotals,
    pub meta: BookingMeta,
}
