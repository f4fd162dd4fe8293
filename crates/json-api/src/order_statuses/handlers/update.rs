//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::order_statuses::models::OrderStatusUpdate;

use crate::{
    extensions::*,
    order_statuses::{errors::into_status_error, index::OrderStatusResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    pub label: String,

    pub sort_order: i32,

    pub is_active: bool,
}

/// Update Order Status Handler
///
/// The key is immutable.
#[endpoint(
    tags("order-statuses"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order status not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    key: PathParam<String>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let status = state
        .app
        .order_statuses
        .update_order_status(
            &key.into_inner(),
            OrderStatusUpdate {
                label: request.label,
                sort_order: request.sort_order,
                is_active: request.is_active,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(status.into()))
}
