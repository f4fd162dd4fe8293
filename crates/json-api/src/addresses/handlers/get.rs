//! Get Address Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::addresses::models::Address;

use crate::{addresses::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,

    pub label: String,

    /// CEP
    pub postal_code: String,

    pub street: String,

    pub number: String,

    pub complement: String,

    pub district: String,

    pub city: String,

    pub state: String,

    pub is_default_delivery: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        let fields = address.fields;

        AddressResponse {
            uuid: address.uuid.into(),
            label: fields.label,
            postal_code: fields.postal_code,
            street: fields.street,
            number: fields.number,
            complement: fields.complement,
            district: fields.district,
            city: fields.city,
            state: fields.state,
            is_default_delivery: fields.is_default_delivery,
            created_at: address.created_at.to_string(),
            updated_at: address.updated_at.to_string(),
        }
    }
}

/// Get Address Handler
///
/// Addresses owned by another customer are reported as missing.
#[endpoint(
    tags("addresses"),
    summary = "Get Address",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .get_address(principal.customer_uuid, address.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(address.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::addresses::{
        AddressesServiceError, MockAddressesService, models::AddressUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER_UUID, customer_service, make_address, mock_app};

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        let mut app = mock_app();

        app.addresses = Arc::new(addresses);

        customer_service(app, Router::with_path("addresses/{address}").get(handler))
    }

    #[tokio::test]
    async fn test_get_address_is_scoped_to_caller() -> TestResult {
        let uuid = AddressUuid::new();

        let mut addresses = MockAddressesService::new();

        addresses
            .expect_get_address()
            .once()
            .withf(move |customer, address| *customer == TEST_CUSTOMER_UUID && *address == uuid)
            .return_once(move |_, _| Ok(make_address(uuid)));

        let body: AddressResponse =
            TestClient::get(format!("http://example.com/addresses/{uuid}"))
                .send(&make_service(addresses))
                .await
                .take_json()
                .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.city, "São Paulo");

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_address_returns_404() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_get_address()
            .once()
            .return_once(|_, _| Err(AddressesServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/addresses/{}",
            AddressUuid::new()
        ))
        .send(&make_service(addresses))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
