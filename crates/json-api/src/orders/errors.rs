//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

use crate::amounts::money_status_error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown product or delivery address")
        }
        OrdersServiceError::EmptyOrder => {
            StatusError::bad_request().brief("An order needs at least one item")
        }
        OrdersServiceError::Validation(message) => StatusError::bad_request().brief(message),
        OrdersServiceError::InvalidStatus(status) => {
            StatusError::bad_request().brief(format!("Unknown or inactive status {status:?}"))
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Money(source) => money_status_error(&source, "amount"),
        OrdersServiceError::OrderNumberExhausted => {
            error!("no free order number left for today");

            StatusError::internal_server_error().brief("Could not create order")
        }
        OrdersServiceError::CreationFailed(source) => {
            error!("order creation failed: {source}");

            StatusError::internal_server_error().brief("Could not create order")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront::money::MoneyError;

    use crate::test_helpers::storage_error;

    use super::*;

    #[test]
    fn creation_failures_are_server_errors() {
        for error in [
            OrdersServiceError::OrderNumberExhausted,
            OrdersServiceError::CreationFailed(storage_error()),
            OrdersServiceError::Sql(storage_error()),
        ] {
            assert_eq!(
                into_status_error(error).code,
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn client_mistakes_are_bad_requests() {
        for error in [
            OrdersServiceError::EmptyOrder,
            OrdersServiceError::InvalidReference,
            OrdersServiceError::InvalidStatus("lost".to_string()),
            OrdersServiceError::Validation("title must not be blank".to_string()),
        ] {
            assert_eq!(into_status_error(error).code, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn overflowing_total_is_unprocessable() {
        assert_eq!(
            into_status_error(OrdersServiceError::Money(MoneyError::AmountOverflow)).code,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
