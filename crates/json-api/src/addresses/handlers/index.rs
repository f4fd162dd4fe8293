//! Address Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    addresses::{errors::into_status_error, get::AddressResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<AddressResponse>,
}

/// Address Index Handler
///
/// Returns the caller's addresses, default delivery address first.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AddressesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(principal.customer_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AddressesResponse {
        addresses: addresses.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::addresses::{
        AddressesServiceError, MockAddressesService, models::AddressUuid,
    };

    use crate::test_helpers::{
        TEST_CUSTOMER_UUID, customer_service, make_address, mock_app, storage_error,
    };

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        let mut app = mock_app();

        app.addresses = Arc::new(addresses);

        customer_service(app, Router::with_path("addresses").get(handler))
    }

    #[tokio::test]
    async fn test_index_lists_callers_addresses() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .withf(|customer| *customer == TEST_CUSTOMER_UUID)
            .return_once(|_| {
                Ok(vec![
                    make_address(AddressUuid::new()),
                    make_address(AddressUuid::new()),
                ])
            });

        let response: AddressesResponse = TestClient::get("http://example.com/addresses")
            .send(&make_service(addresses))
            .await
            .take_json()
            .await?;

        assert_eq!(response.addresses.len(), 2, "expected two addresses");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_failure_returns_500() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .return_once(|_| Err(AddressesServiceError::Sql(storage_error())));

        let res = TestClient::get("http://example.com/addresses")
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
