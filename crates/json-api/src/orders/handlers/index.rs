//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront::money::Currency;
use storefront_app::domain::orders::models::Order;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

impl OrdersResponse {
    pub(crate) fn render(
        orders: Vec<Order>,
        currency: &'static Currency,
    ) -> Result<Self, StatusError> {
        Ok(OrdersResponse {
            orders: orders
                .into_iter()
                .map(|order| OrderResponse::render(order, currency))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Order Index Handler
///
/// Returns the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let orders = state
        .app
        .orders
        .list_customer_orders(principal.customer_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse::render(orders, state.currency())?))
}
