//! Create Address Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::addresses::models::{AddressFields, AddressUuid, NewAddress};

use crate::{
    addresses::{errors::into_status_error, get::AddressResponse},
    extensions::*,
    state::State,
};

/// Address Request
///
/// Shared by create and update. `label` and `complement` may be left out.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressRequest {
    #[serde(default)]
    pub label: String,

    pub postal_code: String,

    pub street: String,

    pub number: String,

    #[serde(default)]
    pub complement: String,

    pub district: String,

    pub city: String,

    /// Two letter state code
    pub state: String,

    #[serde(default)]
    pub is_default_delivery: bool,
}

impl From<AddressRequest> for AddressFields {
    fn from(request: AddressRequest) -> Self {
        AddressFields {
            label: request.label,
            postal_code: request.postal_code,
            street: request.street,
            number: request.number,
            complement: request.complement,
            district: request.district,
            city: request.city,
            state: request.state,
            is_default_delivery: request.is_default_delivery,
        }
    }
}

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .create_address(
            principal.customer_uuid,
            NewAddress {
                uuid: AddressUuid::new(),
                fields: json.into_inner().into(),
            },
        )
        .await
        .map_err(into_status_error)?;

    res.created_at(format!("/addresses/{}", address.uuid))?;

    Ok(Json(address.into()))
}
