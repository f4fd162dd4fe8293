//! Money on the wire.
//!
//! Amounts are rendered as decimal strings. Requests may send either a JSON string or a
//! JSON number; numbers are taken through their shortest textual form, so strings are
//! the exact option.

use rust_decimal::Decimal;
use salvo::prelude::StatusError;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use storefront::money::{MONEY_SCALE, Money, MoneyError};

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A required amount.
pub(crate) fn strict<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text(Value::deserialize(deserializer)?)
        .ok_or_else(|| de::Error::custom("expected a decimal string or number"))
}

/// An optional amount; `null` and a missing field both mean none.
pub(crate) fn optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => text(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected a decimal string or number")),
    }
}

/// Any JSON value. Values that are neither strings nor numbers become an empty string,
/// which later fails to parse.
pub(crate) fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Parse a request amount, answering 400 or 422 on failure.
pub(crate) fn parse_money(raw: &str, field: &str) -> Result<Money, StatusError> {
    Money::parse(raw).map_err(|error| money_status_error(&error, field))
}

pub(crate) fn parse_optional_money(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<Money>, StatusError> {
    raw.map(|raw| parse_money(raw, field)).transpose()
}

/// Parse a decimal that must be exact in hundredths, answering 400 otherwise.
pub(crate) fn parse_hundredths(raw: &str, field: &str) -> Result<Decimal, StatusError> {
    let value = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_parse_error| StatusError::bad_request().brief(format!("Invalid {field}")))?;

    if value.normalize().scale() > MONEY_SCALE {
        return Err(StatusError::bad_request().brief(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }

    Ok(value)
}

pub(crate) fn money_status_error(error: &MoneyError, field: &str) -> StatusError {
    match error {
        MoneyError::InvalidAmount(_) => {
            StatusError::bad_request().brief(format!("Invalid {field}"))
        }
        MoneyError::AmountOverflow => {
            StatusError::unprocessable_entity().brief(format!("{field} is too large"))
        }
    }
}
