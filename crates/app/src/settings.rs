//! Store Settings

use jiff::tz::TimeZone;
use storefront::{
    money::{Currency, DEFAULT_CURRENCY, currency_from_code},
    order_numbers::{OrderNumberError, OrderNumberGenerator},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreSettingsError {
    #[error("unsupported store currency {0:?}")]
    Currency(String),

    #[error("unknown time zone {0:?}")]
    TimeZone(String),

    #[error(transparent)]
    OrderNumbers(#[from] OrderNumberError),
}

/// Store wide settings shared by every service.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub currency: &'static Currency,
    pub order_numbers: OrderNumberGenerator,
}

impl StoreSettings {
    /// Build settings from their configured textual forms.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported currency, unknown time zone or malformed prefix.
    pub fn from_parts(
        currency: &str,
        order_number_prefix: &str,
        time_zone: &str,
    ) -> Result<Self, StoreSettingsError> {
        let currency = currency_from_code(currency).map_err(StoreSettingsError::Currency)?;

        let time_zone = if time_zone.eq_ignore_ascii_case("UTC") {
            TimeZone::UTC
        } else {
            TimeZone::get(time_zone)
                .map_err(|_| StoreSettingsError::TimeZone(time_zone.to_string()))?
        };

        Ok(Self {
            currency,
            order_numbers: OrderNumberGenerator::new(order_number_prefix, time_zone)?,
        })
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY,
            order_numbers: OrderNumberGenerator::default(),
        }
    }
}
