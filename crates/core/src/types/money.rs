//! Money amounts using decimal arithmetic.
//!
//! Supplier CSVs carry prices and unit costs as free-form strings
//! (`"12.5"`, `" 1,299.00 "`, `"-"`). They are parsed into
//! [`rust_decimal::Decimal`] once, at the row boundary, and sent to the
//! Admin API as decimal strings.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while reading a money amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The value is not a decimal number.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
}

/// Monetary amount with currency code, as returned by the Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new money amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }
}

/// ISO 4217 currency codes the store reports costs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    #[serde(other)]
    Other,
}

/// Parse a CSV money cell into a decimal.
///
/// Surrounding whitespace, a leading currency symbol and thousands
/// separators are tolerated.
///
/// # Errors
///
/// Returns `MoneyError::InvalidAmount` if the remaining text is not a
/// decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['$', '€', '£'])
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| MoneyError::InvalidAmount(raw.to_owned()))
}

/// Round a unit cost to cents (half away from zero).
#[must_use]
pub fn round_cost(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
