//! Order Statuses
//!
//! The status taxonomy orders are moved through by staff.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrderStatusesServiceError;
pub(crate) use repository::PgOrderStatusesRepository;
pub use service::*;
