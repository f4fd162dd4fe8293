//! Order Handlers

pub(crate) mod admin;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
