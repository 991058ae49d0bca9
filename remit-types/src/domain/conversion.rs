//! Conversion inputs, derived outputs and the arithmetic between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who pays the bank fee.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Payer {
    #[default]
    Sender,
    Recipient,
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payer::Sender => f.write_str("SENDER"),
            Payer::Recipient => f.write_str("RECIPIENT"),
        }
    }
}

/// Raw user inputs feeding the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionInputs {
    /// Amount in the quote currency, never negative.
    pub amount_to_send: f64,
    /// Explicit receiving amount; mirrors `amount_to_send` when unset.
    pub receiving_amount: Option<f64>,
    /// Bank fee in USD, constant for the session.
    pub fee_usd: f64,
    pub payer: Payer,
}

impl ConversionInputs {
    pub fn new(amount_to_send: f64, fee_usd: f64, payer: Payer) -> Self {
        Self {
            amount_to_send,
            receiving_amount: None,
            fee_usd,
            payer,
        }
    }

    /// The receiving amount shown to the user.
    pub fn receiving_amount(&self) -> f64 {
        self.receiving_amount.unwrap_or(self.amount_to_send)
    }
}

impl Default for ConversionInputs {
    fn default() -> Self {
        Self::new(0.0, 0.0, Payer::Sender)
    }
}

/// Quantities derived from [`ConversionInputs`] and the current rate.
///
/// Values are unrounded; rounding happens only at display time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutputs {
    pub amount_in_base: f64,
    pub fee_in_base: f64,
    pub total_payable_in_base: f64,
    pub effective_rate: f64,
}

/// Derives every displayed quantity from the inputs and a base-per-quote rate.
///
/// Pure: identical arguments always produce identical outputs.
pub fn recompute(inputs: &ConversionInputs, rate: f64) -> ConversionOutputs {
    let amount_in_base = inputs.amount_to_send * rate;
    let fee_in_base = inputs.fee_usd * rate;
    let total_payable_in_base = match inputs.payer {
        Payer::Sender => amount_in_base + fee_in_base,
        Payer::Recipient => amount_in_base,
    };
    let effective_rate = if inputs.amount_to_send > 0.0 {
        total_payable_in_base / inputs.amount_to_send
    } else {
        rate
    };

    ConversionOutputs {
        amount_in_base,
        fee_in_base,
        total_payable_in_base,
        effective_rate,
    }
}
