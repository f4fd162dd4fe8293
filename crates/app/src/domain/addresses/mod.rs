//! Customer Addresses

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::AddressesServiceError;
pub(crate) use repository::PgAddressesRepository;
pub use service::*;
