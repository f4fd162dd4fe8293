//! Update Address Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    addresses::{create::AddressRequest, errors::into_status_error, get::AddressResponse},
    extensions::*,
    state::State,
};

/// Update Address Handler
///
/// Replaces every field. Marking the address as the default delivery address clears the
/// flag on the caller's other addresses.
#[endpoint(
    tags("addresses"),
    summary = "Update Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    json: JsonBody<AddressRequest>,
    depot: &mut Depot,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .update_address(
            principal.customer_uuid,
            address.into_inner().into(),
            json.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(address.into()))
}
