//! Money
//!
//! Exact, non-negative monetary amounts with two fractional digits. Amounts are backed by
//! [`Decimal`] and never pass through a binary floating point representation.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::iso;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use thiserror::Error;

pub use rusty_money::iso::Currency;

/// Number of fractional digits every [`Money`] value carries.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount, in minor units, that any stored price or total may hold.
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999_999_999;

/// Currency used when the store does not configure one.
pub const DEFAULT_CURRENCY: &Currency = iso::BRL;

/// Errors raised while constructing or operating on [`Money`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The input could not be parsed as a decimal amount, or was negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An arithmetic result exceeded the representable range.
    #[error("amount overflow")]
    AmountOverflow,
}

/// A non-negative monetary amount, always held at [`MONEY_SCALE`] digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Build from a decimal, rounding half up to two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] when the amount is negative.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount(amount.to_string()));
        }

        Ok(Self(round(amount)))
    }

    /// Build from integer minor units (cents).
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] when `minor` is negative.
    pub fn from_minor(minor: i64) -> Result<Self, MoneyError> {
        Self::from_decimal(Decimal::new(minor, MONEY_SCALE))
    }

    /// Parse a decimal string such as `"19.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] for unparseable or negative input.
    pub fn parse(value: &str) -> Result<Self, MoneyError> {
        let trimmed = value.trim();

        let amount = Decimal::from_str(trimmed)
            .map_err(|_parse_error| MoneyError::InvalidAmount(trimmed.to_string()))?;

        Self::from_decimal(amount)
    }

    /// The underlying decimal amount.
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// The amount in minor units (cents).
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] when the value exceeds [`MAX_AMOUNT_MINOR`].
    pub fn to_minor(self) -> Result<i64, MoneyError> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .filter(|minor| *minor <= MAX_AMOUNT_MINOR)
            .ok_or(MoneyError::AmountOverflow)
    }

    /// Whether the amount is zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] if the sum is not representable.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(|sum| Self(round(sum)))
            .ok_or(MoneyError::AmountOverflow)
    }

    /// Multiply by an integer quantity.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] if the product is not representable.
    pub fn times(self, quantity: u32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(|product| Self(round(product)))
            .ok_or(MoneyError::AmountOverflow)
    }

    /// `percent`% of this amount, e.g. `percent_of(10)` on 100.00 is 10.00.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] for a negative percentage and
    /// [`MoneyError::AmountOverflow`] if the result is not representable.
    pub fn percent_of(self, percent: Decimal) -> Result<Self, MoneyError> {
        if percent.is_sign_negative() && !percent.is_zero() {
            return Err(MoneyError::InvalidAmount(percent.to_string()));
        }

        self.0
            .checked_mul(percent)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(|share| Self(round(share)))
            .ok_or(MoneyError::AmountOverflow)
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(round(self.0 - other.0))
        }
    }

    /// Render with the symbol and separators of the given currency, e.g. `R$59,97`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::AmountOverflow`] if the amount does not fit in minor units.
    pub fn format_in(self, currency: &'static Currency) -> Result<String, MoneyError> {
        Ok(rusty_money::Money::from_minor(self.to_minor()?, currency).to_string())
    }
}

fn round(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(MONEY_SCALE);

    // -0.00 compares equal to zero but renders with a sign
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    rounded
}

/// Resolve a store currency from its ISO 4217 code.
///
/// # Errors
///
/// Returns the unrecognised code when the store does not support it.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, String> {
    match code.trim().to_ascii_uppercase().as_str() {
        "BRL" => Ok(iso::BRL),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        "GBP" => Ok(iso::GBP),
        other => Err(other.to_string()),
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        Money::parse(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        Money::from_decimal(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        Money::from_decimal(Decimal::from(value)).map_err(E::custom)
    }

    // JSON numbers go through their shortest textual form so 19.99 stays 19.99.
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Money::parse(&value.to_string()).map_err(E::custom)
    }
}
