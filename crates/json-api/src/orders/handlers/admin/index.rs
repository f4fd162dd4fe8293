//! Staff Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::orders::models::OrderFilter;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, index::OrdersResponse},
    state::State,
};

/// Staff Order Index Handler
///
/// Returns every order, newest first, optionally only those in `status`.
#[endpoint(
    tags("orders"),
    summary = "List All Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = state
        .app
        .orders
        .list_orders(OrderFilter {
            status: status.into_inner(),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse::render(orders, state.currency())?))
}
