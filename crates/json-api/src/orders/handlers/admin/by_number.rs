//! Order By Number Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use storefront::order_numbers::OrderNumber;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Order By Number Handler
///
/// Looks an order up by its human readable number, e.g. `PED-250314-0042`.
#[endpoint(
    tags("orders"),
    summary = "Get Order By Number",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed order number"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    number: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let number = number
        .into_inner()
        .parse::<OrderNumber>()
        .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

    let order = state
        .app
        .orders
        .get_order_by_number(&number)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderResponse::render(order, state.currency())?))
}
