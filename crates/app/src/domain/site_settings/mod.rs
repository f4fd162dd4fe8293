//! Site Settings
//!
//! The single row of storefront branding staff can edit at runtime.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::SiteSettingsServiceError;
pub use service::*;
