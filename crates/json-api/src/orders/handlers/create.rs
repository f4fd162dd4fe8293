//! Create Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{
    NewOrder, NewOrderItem, OrderUuid, ShippingDetails,
};

use crate::{
    amounts,
    extensions::*,
    observability::record_order_created,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Checkout Line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemRequest {
    /// Catalog product, when the line came from one
    #[serde(default)]
    pub product_uuid: Option<Uuid>,

    pub title: String,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Decimal string or number. Anything unparseable is recorded as zero.
    #[serde(default, deserialize_with = "amounts::lenient")]
    pub unit_price: String,

    /// Missing or non-positive quantities become one
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl From<OrderItemRequest> for NewOrderItem {
    fn from(item: OrderItemRequest) -> Self {
        NewOrderItem {
            product_uuid: item.product_uuid.map(Into::into),
            title: item.title,
            image_url: item.image_url,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,

    #[serde(default)]
    pub recipient_name: String,

    #[serde(default)]
    pub shipping_address_text: String,

    /// One of the caller's saved addresses
    #[serde(default)]
    pub delivery_address_uuid: Option<Uuid>,

    #[serde(default)]
    pub shipping_method: String,

    #[serde(default)]
    pub payment_method: String,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: OrderUuid::new(),
            items: request.items.into_iter().map(Into::into).collect(),
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

/// Create Order Handler
///
/// Places an order for the caller. The total is computed server side from the submitted
/// lines, and the order starts out `pending` with a freshly allocated order number.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Unit price or total too large"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(order_number = tracing::field::Empty, total = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .create_order(principal.customer_uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let span = tracing::Span::current();

    span.record("order_number", tracing::field::display(&order.order_number));
    span.record("total", tracing::field::display(order.total));

    record_order_created();

    res.created_at(format!("/orders/{}", order.uuid))?;

    Ok(Json(OrderResponse::render(order, state.currency())?))
}
