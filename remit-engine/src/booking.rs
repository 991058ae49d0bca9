//! Booking validation and payload assembly.

use chrono::{DateTime, Utc};
use remit_types::{
    AmountValue, BookingError, BookingFees, BookingMeta, BookingPayload, BookingTotals,
    CurrencyCode, ExchangeRateQuote,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::{ConversionEngine, EngineSnapshot};

/// The predicates a booking must satisfy, exposed so the form can query them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingChecks {
    pub amount_to_send_positive: bool,
    pub receiving_amount_positive: bool,
    pub currencies_present: bool,
    /// From and to may only coincide when both are INR.
    pub pair_allowed: bool,
}

impl BookingChecks {
    pub fn evaluate(snapshot: &EngineSnapshot) -> Self {
        let from = &snapshot.pair.base;
        let to = &snapshot.pair.quote;
        Self {
            amount_to_send_positive: snapshot.inputs.amount_to_send > 0.0,
            receiving_amount_positive: snapshot.inputs.receiving_amount() > 0.0,
            currencies_present: !from.as_str().is_empty() && !to.as_str().is_empty(),
            pair_allowed: !(from == to && *to != CurrencyCode::inr()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.amount_to_send_positive
            && self.receiving_amount_positive
            && self.currencies_present
            && self.pair_allowed
    }

    /// User-facing messages for every failed predicate, in form order.
    pub fn messages(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.amount_to_send_positive {
            errors.push("Enter a valid Amount to be Sent.".to_string());
        }
        if !self.receiving_amount_positive {
            errors.push("Enter a valid Receiving amount.".to_string());
        }
        if !self.currencies_present {
            errors.push("Select both currencies.".to_string());
        }
        if !self.pair_allowed {
            errors.push(format!(
                "Transfer From and To currencies cannot be same unless base is {}.",
                CurrencyCode::inr()
            ));
        }
        errors
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Builds the payload from one snapshot, or returns every validation message.
pub fn build_booking(
    snapshot: &EngineSnapshot,
    now: DateTime<Utc>,
) -> Result<BookingPayload, BookingError> {
    let checks = BookingChecks::evaluate(snapshot);
    if !checks.is_valid() {
        return Err(BookingError::Validation(checks.messages()));
    }

    let base = snapshot.pair.base.clone();
    let quote = snapshot.pair.quote.clone();
    let inputs = &snapshot.inputs;
    let outputs = &snapshot.outputs;

    Ok(BookingPayload {
        from_currency: base.clone(),
        to_currency: quote.clone(),
        amount_to_be_sent: AmountValue::new(inputs.amount_to_send, quote.clone()),
        amount_in_base: AmountValue::new(outputs.amount_in_base.round(), base),
        receiving_amount: AmountValue::new(inputs.receiving_amount(), quote),
        exchange_rate: ExchangeRateQuote {
            base_per_quote: snapshot.latest_rate,
            text: snapshot.rate_label(),
        },
        fees: BookingFees {
            bank_fee_usd: inputs.fee_usd,
            bank_fee_in_base: outputs.fee_in_base.round(),
            payer: inputs.payer,
        },
        totals: BookingTotals {
            total_payable_in_base: round_to(outputs.total_payable_in_base, 2),
            effective_rate: round_to(outputs.effective_rate, 4),
        },
        meta: BookingMeta { ts: now },
    })
}

impl ConversionEngine {
    pub fn booking_checks(&self) -> BookingChecks {
        BookingChecks::evaluate(&self.snapshot())
    }

    /// Validates the current state and assembles the booking payload.
    pub fn book(&self, now: DateTime<Utc>) -> Result<BookingPayload, BookingError> {
        let snapshot = self.snapshot();
        match build_booking(&snapshot, now) {
            Ok(payload) => {
                info!(pair = %snapshot.pair, amount = snapshot.inputs.amount_to_send, "Booking payload built");
                Ok(payload)
            }
            Err(e) => {
                warn!(errors = ?e.messages(), "Booking rejected");
                Err(e)
            }
        }
    }
}
