//! Get Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::coupons::models::CouponRecord;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,

    pub code: String,

    /// `percent` or `fixed`
    pub discount_type: String,

    /// Percentage or amount, depending on `discount_type`
    pub value: String,

    pub min_order_total: Option<String>,

    pub expires_at: Option<String>,

    pub active: bool,

    /// Redemptions recorded so far. Informational only.
    pub used_count: u32,

    /// Redemption cap. Informational only.
    pub max_uses: Option<u32>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(record: CouponRecord) -> Self {
        let coupon = record.coupon;

        CouponResponse {
            uuid: record.uuid.into(),
            code: coupon.code,
            discount_type: coupon.discount_type.to_string(),
            value: coupon.value.normalize().to_string(),
            min_order_total: coupon.min_order_total.map(|minimum| minimum.to_string()),
            expires_at: coupon.expires_at.as_ref().map(ToString::to_string),
            active: coupon.active,
            used_count: coupon.used_count,
            max_uses: coupon.max_uses,
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Get Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupon = state
        .app
        .coupons
        .get_coupon(coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront::coupons::{Coupon, DiscountType};
    use storefront_app::domain::coupons::{
        CouponsServiceError, MockCouponsService, models::CouponUuid,
    };

    use crate::test_helpers::{mock_app, money, staff_service};

    use super::*;

    pub(crate) fn make_coupon(uuid: CouponUuid) -> CouponRecord {
        CouponRecord {
            uuid,
            coupon: Coupon {
                code: "BIGORDER".to_string(),
                discount_type: DiscountType::Percentage,
                value: Decimal::TEN,
                min_order_total: Some(money("100.00")),
                expires_at: None,
                active: true,
                used_count: 3,
                max_uses: Some(3),
            },
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn make_service(coupons: MockCouponsService) -> Service {
        let mut app = mock_app();

        app.coupons = Arc::new(coupons);

        staff_service(app, Router::with_path("admin/coupons/{coupon}").get(handler))
    }

    #[tokio::test]
    async fn test_get_coupon_renders_amounts_as_strings() -> TestResult {
        let uuid = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(make_coupon(uuid)));

        let body: CouponResponse =
            TestClient::get(format!("http://example.com/admin/coupons/{uuid}"))
                .send(&make_service(coupons))
                .await
                .take_json()
                .await?;

        assert_eq!(body.code, "BIGORDER");
        assert_eq!(body.discount_type, "percent");
        assert_eq!(body.value, "10");
        assert_eq!(body.min_order_total.as_deref(), Some("100.00"));
        assert_eq!(body.max_uses, Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_coupon_returns_404() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_get_coupon()
            .once()
            .return_once(|_| Err(CouponsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/admin/coupons/{}",
            CouponUuid::new()
        ))
        .send(&make_service(coupons))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
