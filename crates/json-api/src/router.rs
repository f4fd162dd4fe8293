//! App Router

use salvo::Router;

use crate::{
    addresses, auth, categories, coupons, customers, order_statuses, orders, products,
    site_settings,
};

/// Every resource route, public, customer and staff.
pub(crate) fn app_router() -> Router {
    Router::new().push(storefront_router()).push(
        Router::new()
            .hoop(auth::middleware::handler)
            .push(account_router())
            .push(
                Router::with_path("admin")
                    .hoop(auth::middleware::require_staff)
                    .push(admin_router()),
            ),
    )
}

fn storefront_router() -> Router {
    Router::new()
        .push(Router::with_path("categories").get(categories::index::handler))
        .push(
            Router::with_path("products")
                .get(products::storefront::index::handler)
                .push(Router::with_path("{slug}").get(products::storefront::get::handler)),
        )
        .push(Router::with_path("coupons/apply").post(coupons::apply::handler))
        .push(Router::with_path("site-setting").get(site_settings::get::handler))
}

fn account_router() -> Router {
    Router::new()
        .push(
            Router::with_path("me")
                .get(customers::me::handler)
                .patch(customers::update_me::handler),
        )
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(
                    Router::with_path("{address}")
                        .get(addresses::get::handler)
                        .put(addresses::update::handler)
                        .delete(addresses::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}

fn admin_router() -> Router {
    Router::new()
        .push(
            Router::with_path("categories")
                .post(categories::create::handler)
                .push(
                    Router::with_path("{category}")
                        .put(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::admin::index::handler)
                .push(
                    Router::with_path("by-number/{number}")
                        .get(orders::admin::by_number::handler),
                )
                .push(
                    Router::with_path("{order}")
                        .get(orders::admin::get::handler)
                        .put(orders::admin::update::handler)
                        .delete(orders::admin::delete::handler),
                ),
        )
        .push(
            Router::with_path("order-statuses")
                .get(order_statuses::index::handler)
                .post(order_statuses::create::handler)
                .push(
                    Router::with_path("{key}")
                        .put(order_statuses::update::handler)
                        .delete(order_statuses::delete::handler),
                ),
        )
        .push(
            Router::with_path("coupons")
                .get(coupons::index::handler)
                .post(coupons::create::handler)
                .push(
                    Router::with_path("{coupon}")
                        .get(coupons::get::handler)
                        .put(coupons::update::handler)
                        .delete(coupons::delete::handler),
                ),
        )
        .push(
            Router::with_path("customers")
                .get(customers::index::handler)
                .push(
                    Router::with_path("{customer}")
                        .get(customers::get::handler)
                        .patch(customers::update::handler)
                        .delete(customers::delete::handler),
                ),
        )
        .push(
            Router::with_path("site-setting")
                .get(site_settings::get::handler)
                .put(site_settings::update::handler),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::TestClient,
    };
    use testresult::TestResult;

    use storefront_app::{
        auth::{MockAuthService, Principal},
        context::AppContext,
        domain::{
            categories::MockCategoriesService,
            orders::{MockOrdersService, models::OrderUuid},
            site_settings::MockSiteSettingsService,
        },
    };

    use crate::{
        state::State,
        test_helpers::{TEST_CUSTOMER_UUID, make_order, mock_app},
    };

    use super::*;

    fn make_service(app: AppContext) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(app)))
                .push(app_router()),
        )
    }

    fn auth_as(is_staff: bool) -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(move |_| {
                Ok(Principal {
                    customer_uuid: TEST_CUSTOMER_UUID,
                    is_staff,
                })
            });

        auth
    }

    #[tokio::test]
    async fn test_storefront_routes_need_no_token() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_categories()
            .once()
            .return_once(|| Ok(vec![]));

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let mut app = mock_app();

        app.categories = Arc::new(categories);
        app.auth = Arc::new(auth);

        let res = TestClient::get("http://example.com/categories")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_account_routes_need_a_token() -> TestResult {
        let res = TestClient::get("http://example.com/me")
            .send(&make_service(mock_app()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_reject_customers() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let mut app = mock_app();

        app.auth = Arc::new(auth_as(false));
        app.orders = Arc::new(orders);

        let res = TestClient::get("http://example.com/admin/orders")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_order_number_route_wins_over_uuid_route() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order_by_number()
            .once()
            .withf(|number| number.as_str() == "PED-250314-0042")
            .return_once(|_| Ok(make_order(OrderUuid::new())));
        orders.expect_get_order().never();

        let mut app = mock_app();

        app.auth = Arc::new(auth_as(true));
        app.orders = Arc::new(orders);

        let res = TestClient::get("http://example.com/admin/orders/by-number/PED-250314-0042")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_site_settings_updates_reject_customers() -> TestResult {
        let mut site_settings = MockSiteSettingsService::new();

        site_settings.expect_update_site_settings().never();

        let mut app = mock_app();

        app.auth = Arc::new(auth_as(false));
        app.site_settings = Arc::new(site_settings);

        let res = TestClient::put("http://example.com/admin/site-setting")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .json(&serde_json::json!({
                "site_name": "Loja",
                "primary_color": "#ffffff",
                "currency": "BRL",
            }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
