//! Amount parsing and display formatting.
//!
//! Grouping follows the `en-IN` convention: the last three integer digits
//! form one group and the rest are grouped in pairs (`1,23,45,678`).

use remit_types::{ConversionOutputs, CurrencyCode};
use serde::Serialize;

/// Fraction digits used for the rate label, as `Intl.NumberFormat` does by default.
pub const RATE_LABEL_FRACTION_DIGITS: usize = 3;

/// Parses a user-entered amount.
///
/// Thousands separators and surrounding whitespace are ignored. Empty,
/// unparsable, non-finite and negative input all yield `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Formats with en-IN grouping and at most `max_fraction_digits` decimals,
/// dropping trailing zeros.
pub fn format_en_in(value: f64, max_fraction_digits: usize) -> String {
    format_grouped(value, max_fraction_digits, true)
}

/// Formats with en-IN grouping and exactly `fraction_digits` decimals.
pub fn format_en_in_fixed(value: f64, fraction_digits: usize) -> String {
    format_grouped(value, fraction_digits, false)
}

fn format_grouped(value: f64, digits: usize, trim_zeros: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };
    let frac_part = if trim_zeros {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let mut out = String::new();
    let is_zero = int_part.chars().chain(frac_part.chars()).all(|c| c == '0');
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_integer(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_integer(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    if !head.is_empty() {
        groups.push(head);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `1 USD = 88.099 INR`
pub fn rate_label(quote: &CurrencyCode, rate: f64, base: &CurrencyCode) -> String {
    format!(
        "1 {} = {} {}",
        quote,
        format_en_in(rate, RATE_LABEL_FRACTION_DIGITS),
        base
    )
}

/// The strings shown for a set of [`ConversionOutputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedOutputs {
    /// Whole base units.
    pub amount_in_base: String,
    /// Whole base units.
    pub fee_in_base: String,
    /// Grouped, two decimals.
    pub total_payable_in_base: String,
    /// Four decimals.
    pub effective_rate: String,
}

impl From<&ConversionOutputs> for DisplayedOutputs {
    fn from(out: &ConversionOutputs) -> Self {
        Self {
            amount_in_base: format!("{:.0}", out.amount_in_base.round()),
            fee_in_base: format!("{:.0}", out.fee_in_base.round()),
            total_payable_in_base: format_en_in_fixed(out.total_payable_in_base, 2),
            effective_rate: format!("{:.4}", out.effective_rate),
        }
    }
}
