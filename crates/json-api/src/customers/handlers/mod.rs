//! Customer Handlers

pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod me;
pub(crate) mod update;
pub(crate) mod update_me;
