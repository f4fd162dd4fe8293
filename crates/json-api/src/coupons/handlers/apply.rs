//! Apply Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront::coupons::AppliedCoupon;

use crate::{
    amounts::{self, parse_money},
    coupons::errors::into_status_error,
    extensions::*,
    observability::{CouponOutcome, record_coupon_application},
    state::State,
};

/// Apply Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponRequest {
    pub code: String,

    /// Cart subtotal as a decimal string or number
    #[serde(deserialize_with = "amounts::strict")]
    pub subtotal: String,
}

/// Applied Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedCouponResponse {
    pub code: String,

    /// Amount taken off the subtotal, never more than the subtotal
    pub discount_amount: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    pub value: String,

    pub expires_at: Option<String>,
}

impl From<AppliedCoupon> for AppliedCouponResponse {
    fn from(applied: AppliedCoupon) -> Self {
        AppliedCouponResponse {
            code: applied.code,
            discount_amount: applied.discount_amount.to_string(),
            discount_type: applied.discount_type.to_string(),
            value: applied.value.normalize().to_string(),
            expires_at: applied.expires_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Apply Coupon Handler
///
/// Validates a coupon against a subtotal and returns the discount. Usage counters are
/// not touched.
#[endpoint(
    tags("coupons"),
    summary = "Apply Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown coupon code"),
        (status_code = StatusCode::BAD_REQUEST, description = "Coupon invalid, expired or below minimum"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<AppliedCouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let subtotal = parse_money(&request.subtotal, "subtotal")?;

    let applied = state
        .app
        .coupons
        .apply_coupon(request.code.trim(), subtotal, Timestamp::now())
        .await
        .map_err(|error| {
            record_coupon_application(CouponOutcome::Rejected);

            into_status_error(error)
        })?;

    record_coupon_application(CouponOutcome::Applied);

    Ok(Json(applied.into()))
}
