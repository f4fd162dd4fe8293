//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::money::Currency;
use storefront_app::domain::orders::models::{Order, OrderItem};

use crate::{
    amounts::money_status_error, extensions::*, orders::errors::into_status_error, state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,

    pub product_uuid: Option<Uuid>,

    pub title: String,

    pub image_url: Option<String>,

    pub unit_price: String,

    pub quantity: u32,

    pub line_total: String,
}

impl OrderItemResponse {
    fn try_from_item(item: OrderItem) -> Result<Self, StatusError> {
        let line_total = item
            .line_total()
            .map_err(|error| money_status_error(&error, "line total"))?;

        Ok(OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.map(Into::into),
            title: item.title,
            image_url: item.image_url,
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity.get(),
            line_total: line_total.to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    pub customer_uuid: Uuid,

    /// Human readable reference, e.g. `PED-250314-0042`
    pub order_number: String,

    pub status: String,

    /// Exact decimal total
    pub total: String,

    /// Total formatted in the store currency
    pub total_display: Option<String>,

    pub recipient_name: String,

    pub shipping_address_text: String,

    pub delivery_address_uuid: Option<Uuid>,

    pub shipping_method: String,

    pub payment_method: String,

    pub items: Vec<OrderItemResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl OrderResponse {
    /// Render an order, formatting its total in `currency`.
    pub(crate) fn render(order: Order, currency: &'static Currency) -> Result<Self, StatusError> {
        let items = order
            .items
            .into_iter()
            .map(OrderItemResponse::try_from_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderResponse {
            uuid: order.uuid.into(),
            customer_uuid: order.customer_uuid.into(),
            order_number: order.order_number.into_string(),
            status: order.status,
            total: order.total.to_string(),
            total_display: order.total.format_in(currency).ok(),
            recipient_name: order.shipping.recipient_name,
            shipping_address_text: order.shipping.shipping_address_text,
            delivery_address_uuid: order.shipping.delivery_address_uuid.map(Into::into),
            shipping_method: order.shipping.shipping_method,
            payment_method: order.shipping.payment_method,
            items,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        })
    }
}

/// Get Order Handler
///
/// Orders placed by another customer are reported as missing.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_customer_order(principal.customer_uuid, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderResponse::render(order, state.currency())?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService, OrdersServiceError, models::OrderUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER_UUID, customer_service, make_order, mock_app};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = mock_app();

        app.orders = Arc::new(orders);

        customer_service(app, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_renders_totals() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_customer_order()
            .once()
            .withf(move |customer, order| *customer == TEST_CUSTOMER_UUID && *order == uuid)
            .return_once(move |_, _| Ok(make_order(uuid)));

        let body: OrderResponse = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.order_number, "PED-250314-0042");
        assert_eq!(body.total, "59.97");
        assert_eq!(body.items.len(), 1, "expected one item");
        assert_eq!(body.items[0].line_total, "59.97");
        assert!(
            body.total_display.is_some_and(|display| display.contains("59")),
            "expected a formatted total"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_customer_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
