//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coupons::{AppliedCoupon, Coupon, CouponError, DiscountType, apply_coupon},
    money::{MAX_AMOUNT_MINOR, Money, MoneyError, currency_from_code},
    order_numbers::{
        DEFAULT_ORDER_NUMBER_PREFIX, MAX_ATTEMPTS, OrderNumber, OrderNumberError,
        OrderNumberGenerator,
    },
    totals::{LineItem, MAX_ORDER_TOTAL_MINOR, Quantity, compute_total},
};
