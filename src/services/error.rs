//! Service-level error taxonomy.
//!
//! Every operation reports failures through [`ServiceError`]; the HTTP layer
//! maps each variant onto a status code and the uniform
//! `{"success": false, "message"}` body. Nothing below the boundary ever
//! swallows an error.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure classes surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials (HTTP 401).
    #[error("{0}")]
    Auth(String),

    /// Authenticated but not allowed (HTTP 403).
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// State conflict: duplicate identifier, unavailable slot, overlapping
    /// booking (HTTP 409).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected non-store failure, e.g. hashing or token signing (HTTP 500).
    #[error("{0}")]
    Internal(String),

    /// Unexpected store failure (HTTP 500).
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        // NotFound/Conflict carry user-facing messages straight through; the
        // rest stay opaque store failures.
        match err {
            RepositoryError::NotFound { message, .. } => ServiceError::NotFound(message),
            RepositoryError::Conflict { message, .. } => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}
