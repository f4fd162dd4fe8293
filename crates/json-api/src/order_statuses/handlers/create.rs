//! Create Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::order_statuses::models::OrderStatus;

use crate::{
    extensions::*,
    order_statuses::{errors::into_status_error, index::OrderStatusResponse},
    state::State,
};

/// Create Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderStatusRequest {
    /// Lower case letters, digits and underscores
    pub key: String,

    pub label: String,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Create Order Status Handler
#[endpoint(
    tags("order-statuses"),
    summary = "Create Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order status created"),
        (status_code = StatusCode::CONFLICT, description = "Order status already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderStatusRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let status = state
        .app
        .order_statuses
        .create_order_status(OrderStatus {
            key: request.key,
            label: request.label,
            sort_order: request.sort_order,
            is_active: request.is_active,
        })
        .await
        .map_err(into_status_error)?;

    res.created_at(format!("/admin/order-statuses/{}", status.key))?;

    Ok(Json(status.into()))
}
