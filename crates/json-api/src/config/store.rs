//! Store Config

use clap::Args;
use storefront::{money::DEFAULT_CURRENCY, order_numbers::DEFAULT_ORDER_NUMBER_PREFIX};
use storefront_app::settings::{StoreSettings, StoreSettingsError};

/// Store wide settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 code of the currency every price is expressed in
    #[arg(long, env = "STORE_CURRENCY", default_value = DEFAULT_CURRENCY.iso_alpha_code)]
    pub store_currency: String,

    /// Prefix of generated order numbers
    #[arg(long, env = "ORDER_NUMBER_PREFIX", default_value = DEFAULT_ORDER_NUMBER_PREFIX)]
    pub order_number_prefix: String,

    /// IANA time zone used for the date part of order numbers
    #[arg(long, env = "ORDER_TIME_ZONE", default_value = "UTC")]
    pub order_time_zone: String,
}

impl StoreConfig {
    /// Validate the configured values into [`StoreSettings`].
    pub(crate) fn settings(&self) -> Result<StoreSettings, StoreSettingsError> {
        StoreSettings::from_parts(
            &self.store_currency,
            &self.order_number_prefix,
            &self.order_time_zone,
        )
    }
}
