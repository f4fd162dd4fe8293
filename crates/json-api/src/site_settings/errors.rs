//! Site Settings Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::site_settings::SiteSettingsServiceError;

pub(crate) fn into_status_error(error: SiteSettingsServiceError) -> StatusError {
    match error {
        SiteSettingsServiceError::Validation(message) => StatusError::bad_request().brief(message),
        SiteSettingsServiceError::MissingRequiredData | SiteSettingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid site settings payload")
        }
        SiteSettingsServiceError::Sql(source) => {
            error!("site settings storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
