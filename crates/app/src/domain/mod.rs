//! Storefront Domain Concerns

pub mod addresses;
pub mod categories;
pub mod coupons;
pub mod customers;
pub mod order_statuses;
pub mod orders;
pub mod products;
pub mod site_settings;

pub(crate) mod slugs;
