//! Storefront
//!
//! The pricing engine behind the storefront: exact money, order numbers, order totals and
//! coupon discounts. Everything here is pure; storage and transport live in the
//! `storefront-app` and `storefront-json` crates.

pub mod coupons;
pub mod money;
pub mod order_numbers;
pub mod prelude;
pub mod totals;
