//! Order Status Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::order_statuses::OrderStatusesServiceError;

pub(crate) fn into_status_error(error: OrderStatusesServiceError) -> StatusError {
    match error {
        OrderStatusesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order status already exists")
        }
        OrderStatusesServiceError::Validation(message) => {
            StatusError::bad_request().brief(message)
        }
        OrderStatusesServiceError::MissingRequiredData | OrderStatusesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order status payload")
        }
        OrderStatusesServiceError::NotFound => StatusError::not_found(),
        OrderStatusesServiceError::Sql(source) => {
            error!("order status storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
