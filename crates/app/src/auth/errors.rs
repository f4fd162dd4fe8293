//! Auth service errors.

use thiserror::Error;

use crate::auth::ApiTokenError;

/// Why a presented bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token is not in the issued format")]
    Malformed,

    /// Never issued, revoked or past its expiry.
    #[error("no active token with this id")]
    Unknown,

    #[error("secret does not match the stored verifier")]
    SecretMismatch,
}

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token rejected: {0}")]
    Rejected(TokenRejection),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),

    #[error("token processing error")]
    Token(#[from] ApiTokenError),
}
