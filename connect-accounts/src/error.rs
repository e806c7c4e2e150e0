//! Error types for account management

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Account management error types.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Referenced user does not exist
    #[error("User {0} not found")]
    NotFound(Uuid),

    /// Email address already belongs to another account
    #[error("Email address already in use")]
    EmailTaken,

    /// Input failed a validation gate; no transaction was opened
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Actor may not manage this account or role; no write happened
    #[error("Forbidden: {0}")]
    Authorization(String),

    /// Persistence collaborator failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

impl AccountError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccountError::NotFound(_) => 404,
            AccountError::EmailTaken => 409,
            AccountError::Validation(_) => 422,
            AccountError::Authorization(_) => 403,
            AccountError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccountError::NotFound(_) => "USER_NOT_FOUND",
            AccountError::EmailTaken => "EMAIL_TAKEN",
            AccountError::Validation(_) => "VALIDATION_FAILED",
            AccountError::Authorization(_) => "FORBIDDEN",
            AccountError::Store(_) => "STORE_ERROR",
        }
    }
}
