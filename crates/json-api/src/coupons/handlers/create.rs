//! Create Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront::coupons::{Coupon, DiscountType};
use storefront_app::domain::coupons::models::{CouponUuid, NewCoupon};

use crate::{
    amounts::{self, parse_hundredths, parse_optional_money},
    coupons::{errors::into_status_error, get::CouponResponse},
    extensions::*,
    state::State,
};

/// A full coupon definition. Used for both create and replacement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponRequest {
    pub code: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    /// Percentage (0 to 100) or amount, as a decimal string or number
    #[serde(deserialize_with = "amounts::strict")]
    pub value: String,

    #[serde(default, deserialize_with = "amounts::optional")]
    pub min_order_total: Option<String>,

    /// RFC 3339 instant from which the coupon no longer applies
    #[serde(default)]
    pub expires_at: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub used_count: u32,

    #[serde(default)]
    pub max_uses: Option<u32>,
}

fn default_active() -> bool {
    true
}

impl CouponRequest {
    pub(crate) fn into_coupon(self) -> Result<Coupon, StatusError> {
        let discount_type = self
            .discount_type
            .trim()
            .parse::<DiscountType>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        let expires_at = self
            .expires_at
            .as_deref()
            .map(str::parse::<Timestamp>)
            .transpose()
            .map_err(|_parse_error| StatusError::bad_request().brief("Invalid expires_at"))?;

        Ok(Coupon {
            code: self.code.trim().to_string(),
            discount_type,
            value: parse_hundredths(&self.value, "value")?,
            min_order_total: parse_optional_money(
                self.min_order_total.as_deref(),
                "min_order_total",
            )?,
            expires_at,
            active: self.active,
            used_count: self.used_count,
            max_uses: self.max_uses,
        })
    }
}

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Amount too large"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupon = json.into_inner().into_coupon()?;

    let record = state
        .app
        .coupons
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            coupon,
        })
        .await
        .map_err(into_status_error)?;

    res.created_at(format!("/admin/coupons/{}", record.uuid))?;

    Ok(Json(record.into()))
}
