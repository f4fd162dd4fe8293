//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::money::MoneyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order has no items")]
    EmptyOrder,

    #[error("{0}")]
    Validation(String),

    #[error("unknown or inactive order status {0:?}")]
    InvalidStatus(String),

    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("order could not be created")]
    CreationFailed(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Map a storage error raised while placing an order. Constraint violations keep their
    /// meaning; anything else becomes [`Self::CreationFailed`].
    pub(crate) fn creation(error: Error) -> Self {
        match Self::from(error) {
            Self::Sql(error) => Self::CreationFailed(error),
            other => other,
        }
    }
}

impl From<Error> for OrdersServiceError {
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
