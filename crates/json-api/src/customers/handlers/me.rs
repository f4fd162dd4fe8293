//! Current Customer Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    customers::{errors::into_status_error, get::CustomerResponse},
    extensions::*,
    state::State,
};

/// Current Customer Handler
///
/// Returns the profile of the token's owner.
#[endpoint(
    tags("account"),
    summary = "Get Profile",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CustomerResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let customer = state
        .app
        .customers
        .get_customer(principal.customer_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(customer.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::customers::MockCustomersService;

    use crate::test_helpers::{
        TEST_CUSTOMER_UUID, customer_service, make_customer, mock_app, public_service,
    };

    use super::*;

    #[tokio::test]
    async fn test_me_returns_own_profile() -> TestResult {
        let mut customers = MockCustomersService::new();

        customers
            .expect_get_customer()
            .once()
            .withf(|u| *u == TEST_CUSTOMER_UUID)
            .return_once(|u| Ok(make_customer(u)));

        let mut app = mock_app();

        app.customers = Arc::new(customers);

        let body: CustomerResponse = TestClient::get("http://example.com/me")
            .send(&customer_service(app, Router::with_path("me").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, TEST_CUSTOMER_UUID.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_me_without_principal_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com/me")
            .send(&public_service(mock_app(), Router::with_path("me").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
