//! Staff Update Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{OrderUpdate, ShippingDetails};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Update Order Request
///
/// Shipping fields replace the stored ones; omitted fields are cleared.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    /// Key of an active order status
    pub status: String,

    #[serde(default)]
    pub recipient_name: String,

    #[serde(default)]
    pub shipping_address_text: String,

    #[serde(default)]
    pub delivery_address_uuid: Option<Uuid>,

    #[serde(default)]
    pub shipping_method: String,

    #[serde(default)]
    pub payment_method: String,
}

impl From<UpdateOrderRequest> for OrderUpdate {
    fn from(request: UpdateOrderRequest) -> Self {
        OrderUpdate {
            status: request.status,
            shipping: ShippingDetails {
                recipient_name: request.recipient_name,
                shipping_address_text: request.shipping_address_text,
                delivery_address_uuid: request.delivery_address_uuid.map(Into::into),
                shipping_method: request.shipping_method,
                payment_method: request.payment_method,
            },
        }
    }
}

/// Staff Update Order Handler
///
/// Items and total are fixed once an order is placed.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown or inactive status"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(order, json, depot),
    fields(status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update: OrderUpdate = json.into_inner().into();

    tracing::Span::current().record("status", update.status.as_str());

    let order = state
        .app
        .orders
        .update_order(order.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderResponse::render(order, state.currency())?))
}
