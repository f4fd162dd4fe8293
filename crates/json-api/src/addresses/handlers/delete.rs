//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{addresses::errors::into_status_error, extensions::*, state::State};

/// Delete Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Delete Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Address deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .addresses
        .delete_address(principal.customer_uuid, address.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::addresses::{
        AddressesServiceError, MockAddressesService, models::AddressUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER_UUID, customer_service, mock_app};

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        let mut app = mock_app();

        app.addresses = Arc::new(addresses);

        customer_service(app, Router::with_path("addresses/{address}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_address_returns_204() -> TestResult {
        let uuid = AddressUuid::new();

        let mut addresses = MockAddressesService::new();

        addresses
            .expect_delete_address()
            .once()
            .withf(move |customer, address| *customer == TEST_CUSTOMER_UUID && *address == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/addresses/{uuid}"))
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_address_returns_404() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_delete_address()
            .once()
            .return_once(|_, _| Err(AddressesServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/addresses/{}",
            AddressUuid::new()
        ))
        .send(&make_service(addresses))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
