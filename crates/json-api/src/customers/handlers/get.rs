//! Get Customer Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::customers::models::Customer;

use crate::{customers::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerResponse {
    pub uuid: Uuid,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// CPF or CNPJ
    pub tax_id: String,

    pub is_staff: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            uuid: customer.uuid.into(),
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            tax_id: customer.tax_id,
            is_staff: customer.is_staff,
            created_at: customer.created_at.to_string(),
            updated_at: customer.updated_at.to_string(),
        }
    }
}

/// Get Customer Handler
#[endpoint(
    tags("customers"),
    summary = "Get Customer",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    customer: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CustomerResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let customer = state
        .app
        .customers
        .get_customer(customer.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(customer.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::customers::{
        CustomersServiceError, MockCustomersService, models::CustomerUuid,
    };

    use crate::test_helpers::{make_customer, mock_app, staff_service};

    use super::*;

    fn make_service(customers: MockCustomersService) -> Service {
        let mut app = mock_app();

        app.customers = Arc::new(customers);

        staff_service(app, Router::with_path("admin/customers/{customer}").get(handler))
    }

    #[tokio::test]
    async fn test_get_customer() -> TestResult {
        let uuid = CustomerUuid::new();

        let mut customers = MockCustomersService::new();

        customers
            .expect_get_customer()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(make_customer(uuid)));

        let body: CustomerResponse =
            TestClient::get(format!("http://example.com/admin/customers/{uuid}"))
                .send(&make_service(customers))
                .await
                .take_json()
                .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.email, "ana@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_customer_returns_404() -> TestResult {
        let mut customers = MockCustomersService::new();

        customers
            .expect_get_customer()
            .once()
            .return_once(|_| Err(CustomersServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/admin/customers/{}",
            CustomerUuid::new()
        ))
        .send(&make_service(customers))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
