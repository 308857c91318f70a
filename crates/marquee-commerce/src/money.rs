//! Money, currencies and minor-unit conversion.
//!
//! Cart prices are major-unit decimals (dollars, not cents) held as
//! [`Decimal`], so sums are exact. The payment provider wants integer minor
//! units; [`to_minor_units`] is the single place that conversion happens.

use crate::error::CommerceError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Lower-case code, as payment providers expect it on the wire (e.g., "usd").
    pub fn wire_code(&self) -> String {
        self.code().to_ascii_lowercase()
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }

    /// Format a major-unit amount (e.g., "$29.97").
    pub fn format_major(&self, amount: Decimal) -> String {
        let places = self.decimal_places();
        let mut rounded =
            amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        // Fix the scale so "29.9" prints as "29.90".
        rounded.rescale(places);
        format!("{}{}", self.symbol(), rounded)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How a major-unit amount is rounded to whole minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// 0.5 rounds away from zero (2.345 -> 2.35).
    #[default]
    HalfAwayFromZero,
    /// 0.5 rounds to the even neighbour (2.345 -> 2.34).
    HalfEven,
}

impl RoundingPolicy {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Convert a major-unit amount to integer minor units.
///
/// ```
/// use marquee_commerce::money::{to_minor_units, Currency, RoundingPolicy};
/// use rust_decimal::Decimal;
///
/// let cents = to_minor_units(Decimal::new(999, 2), Currency::USD, RoundingPolicy::default());
/// assert_eq!(cents.unwrap(), 999);
/// ```
pub fn to_minor_units(
    major: Decimal,
    currency: Currency,
    policy: RoundingPolicy,
) -> Result<i64, CommerceError> {
    let scale = Decimal::from(10_i64.pow(currency.decimal_places()));
    major
        .checked_mul(scale)
        .map(|scaled| scaled.round_dp_with_strategy(0, policy.strategy()))
        .and_then(|rounded| rounded.to_i64())
        .ok_or(CommerceError::Overflow)
}

/// A monetary value in minor units (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Convert a major-unit amount.
    pub fn from_major(
        major: Decimal,
        currency: Currency,
        policy: RoundingPolicy,
    ) -> Result<Self, CommerceError> {
        Ok(Self::new(to_minor_units(major, currency, policy)?, currency))
    }

    /// The amount in major units.
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.amount_minor, self.currency.decimal_places())
    }

    /// Try to add another Money value.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Try to multiply by a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_minor
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        self.currency.format_major(self.to_major())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_canonical_prices_convert_exactly() {
        let policy = RoundingPolicy::default();
        assert_eq!(to_minor_units(dec("9.99"), Currency::USD, policy).unwrap(), 999);
        assert_eq!(to_minor_units(dec("0.01"), Currency::USD, policy).unwrap(), 1);
        assert_eq!(to_minor_units(dec("1234.5"), Currency::USD, policy).unwrap(), 123450);
        assert_eq!(to_minor_units(dec("0"), Currency::USD, policy).unwrap(), 0);
    }

    #[test]
    fn test_rounding_policies_differ_on_midpoint() {
        let away = to_minor_units(dec("2.345"), Currency::USD, RoundingPolicy::HalfAwayFromZero);
        let even = to_minor_units(dec("2.345"), Currency::USD, RoundingPolicy::HalfEven);
        assert_eq!(away.unwrap(), 235);
        assert_eq!(even.unwrap(), 234);

        // Off the midpoint both agree.
        let a = to_minor_units(dec("2.346"), Currency::USD, RoundingPolicy::HalfAwayFromZero);
        let b = to_minor_units(dec("2.346"), Currency::USD, RoundingPolicy::HalfEven);
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_zero_decimal_currency() {
        let yen = to_minor_units(dec("500"), Currency::JPY, RoundingPolicy::default()).unwrap();
        assert_eq!(yen, 500);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = to_minor_units(Decimal::MAX, Currency::USD, RoundingPolicy::default());
        assert!(matches!(result, Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(500, Currency::JPY).display(), "\u{00a5}500");
        assert_eq!(Currency::USD.format_major(dec("29.9")), "$29.90");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(999, Currency::USD);
        assert_eq!(a.try_multiply(3).unwrap().amount_minor, 2997);
        assert_eq!(a.try_add(&a).unwrap().amount_minor, 1998);
        assert!(matches!(
            a.try_add(&Money::new(1, Currency::EUR)),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            Money::new(i64::MAX, Currency::USD).try_multiply(2),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
        assert_eq!(Currency::GBP.wire_code(), "gbp");
    }
}
