//! Storefront product handlers: active products only, addressed by slug.

pub(crate) mod get;
pub(crate) mod index;
