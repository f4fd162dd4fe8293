//! Update Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    coupons::{create::CouponRequest, errors::into_status_error, get::CouponResponse},
    extensions::*,
    state::State,
};

/// Update Coupon Handler
///
/// Replaces the whole definition, usage counters included.
#[endpoint(
    tags("coupons"),
    summary = "Update Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Amount too large"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    json: JsonBody<CouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let definition = json.into_inner().into_coupon()?;

    let record = state
        .app
        .coupons
        .update_coupon(coupon.into_inner().into(), definition)
        .await
        .map_err(into_status_error)?;

    Ok(Json(record.into()))
}
