//! Order Status Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::order_statuses::models::OrderStatus;

use crate::{extensions::*, order_statuses::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusResponse {
    pub key: String,

    pub label: String,

    pub sort_order: i32,

    pub is_active: bool,
}

impl From<OrderStatus> for OrderStatusResponse {
    fn from(status: OrderStatus) -> Self {
        OrderStatusResponse {
            key: status.key,
            label: status.label,
            sort_order: status.sort_order,
            is_active: status.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusesResponse {
    pub order_statuses: Vec<OrderStatusResponse>,
}

/// Order Status Index Handler
///
/// Returns every status, active or not, by sort order.
#[endpoint(
    tags("order-statuses"),
    summary = "List Order Statuses",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrderStatusesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let statuses = state
        .app
        .order_statuses
        .list_order_statuses()
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderStatusesResponse {
        order_statuses: statuses.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::order_statuses::MockOrderStatusesService;

    use crate::test_helpers::{mock_app, staff_service};

    use super::*;

    fn make_status(key: &str, label: &str, sort_order: i32) -> OrderStatus {
        OrderStatus {
            key: key.to_string(),
            label: label.to_string(),
            sort_order,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_index_keeps_sort_order() -> TestResult {
        let mut statuses = MockOrderStatusesService::new();

        statuses
            .expect_list_order_statuses()
            .once()
            .return_once(|| {
                Ok(vec![
                    make_status("pending", "Pendente", 0),
                    make_status("shipped", "Enviado", 20),
                ])
            });

        let mut app = mock_app();

        app.order_statuses = Arc::new(statuses);

        let response: OrderStatusesResponse =
            TestClient::get("http://example.com/admin/order-statuses")
                .send(&staff_service(
                    app,
                    Router::with_path("admin/order-statuses").get(handler),
                ))
                .await
                .take_json()
                .await?;

        let keys: Vec<&str> = response
            .order_statuses
            .iter()
            .map(|status| status.key.as_str())
            .collect();

        assert_eq!(keys, ["pending", "shipped"]);

        Ok(())
    }
}
