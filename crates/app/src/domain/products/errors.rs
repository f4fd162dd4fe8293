//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::money::MoneyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("another product already uses this slug")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("category does not exist")]
    InvalidReference,

    #[error("product is missing a required column")]
    MissingRequiredData,

    #[error("product violates a catalog constraint")]
    InvalidData,

    /// Rejected before reaching the database.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
