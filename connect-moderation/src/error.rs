//! Error types for moderation operations
//!
//! Callers discriminate on the variant, never on message text; each variant
//! maps to a stable error code and an HTTP-equivalent status.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Moderation error types.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Referenced POI does not exist
    #[error("Point of interest {0} not found")]
    NotFound(Uuid),

    /// Approve attempted on an already-approved POI
    #[error("POI already approved")]
    AlreadyApproved,

    /// Reject attempted on an already-rejected POI
    #[error("POI already rejected")]
    AlreadyRejected,

    /// Reapprove attempted on a POI that is not rejected
    #[error("Only rejected POIs may be reapproved")]
    NotRejected,

    /// Input failed a validation gate; no transaction was opened
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Actor's role is insufficient; no transaction was opened
    #[error("Forbidden: {0}")]
    Authorization(String),

    /// Persistence collaborator failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for moderation operations.
pub type ModerationResult<T> = Result<T, ModerationError>;

impl ModerationError {
    /// Check if this error should be logged at error level.
    ///
    /// Domain rejections (conflicts, validation, authorization) are expected
    /// outcomes and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ModerationError::Store(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ModerationError::NotFound(_) => 404,
            ModerationError::AlreadyApproved
            | ModerationError::AlreadyRejected
            | ModerationError::NotRejected => 409,
            ModerationError::Validation(_) => 422,
            ModerationError::Authorization(_) => 403,
            ModerationError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ModerationError::NotFound(_) => "POI_NOT_FOUND",
            ModerationError::AlreadyApproved => "ALREADY_APPROVED",
            ModerationError::AlreadyRejected => "ALREADY_REJECTED",
            ModerationError::NotRejected => "NOT_REJECTED",
            ModerationError::Validation(_) => "VALIDATION_FAILED",
            ModerationError::Authorization(_) => "FORBIDDEN",
            ModerationError::Store(_) => "STORE_ERROR",
        }
    }
}
