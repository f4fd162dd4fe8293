//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use storefront::coupons::CouponError;
use storefront_app::domain::coupons::CouponsServiceError;

use crate::amounts::money_status_error;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon code already in use")
        }
        CouponsServiceError::MissingRequiredData | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::NotFound => StatusError::not_found(),
        CouponsServiceError::Coupon(error) => coupon_status_error(error),
        CouponsServiceError::Sql(source) => {
            error!("coupon storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn coupon_status_error(error: CouponError) -> StatusError {
    match error {
        CouponError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponError::Invalid => StatusError::bad_request().brief("Coupon is inactive or expired"),
        CouponError::BelowMinimum { minimum } => StatusError::bad_request()
            .brief(format!("Order total is below the coupon minimum of {minimum}")),
        CouponError::UnknownDiscountType(_) | CouponError::InvalidValue(_) => {
            StatusError::bad_request().brief(error.to_string())
        }
        CouponError::Money(error) => money_status_error(&error, "amount"),
    }
}
