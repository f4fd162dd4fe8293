//! Address Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::addresses::AddressesServiceError;

pub(crate) fn into_status_error(error: AddressesServiceError) -> StatusError {
    match error {
        AddressesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Address already exists")
        }
        AddressesServiceError::Validation(message) => StatusError::bad_request().brief(message),
        AddressesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown customer")
        }
        AddressesServiceError::MissingRequiredData | AddressesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid address payload")
        }
        AddressesServiceError::NotFound => StatusError::not_found(),
        AddressesServiceError::Sql(source) => {
            error!("address storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
