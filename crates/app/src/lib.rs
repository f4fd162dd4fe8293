//! Storefront domain services, persistence and authentication.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod settings;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
