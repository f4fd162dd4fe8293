//! Orders
//!
//! Order placement and administration. An order and its items are always written in a
//! single transaction; the total is computed from the stored items, never taken from the
//! caller.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
