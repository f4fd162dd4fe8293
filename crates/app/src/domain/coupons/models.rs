//! Coupon Models

use jiff::Timestamp;
use storefront::coupons::Coupon;

use crate::uuids::TypedUuid;

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// A stored coupon definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub coupon: Coupon,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Coupon Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub coupon: Coupon,
}
