//! Error types for the profile service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Validation Error ==
/// A candidate record or query failed a content rule.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username must be 3-20 characters of letters, digits or underscore")]
    InvalidUsername,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("bio exceeds maximum length of 1000 characters")]
    BioTooLong,

    #[error("bio contains disallowed content")]
    BioRejected,

    #[error("search query required")]
    MissingSearchTerm,
}

// == Store Error ==
/// Failure reported by a `UserStore`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or a connection could not be acquired
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// A uniqueness rule rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The statement failed or a row could not be decoded
    #[error("query failure: {0}")]
    QueryFailure(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::ConstraintViolation(db_err.message().to_string());
                }
                Self::QueryFailure(err.to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::ConnectionFailure(err.to_string()),
            _ => Self::QueryFailure(err.to_string()),
        }
    }
}

// == Profile Error Enum ==
/// Unified error type for profile operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body could not be decoded
    #[error("Invalid JSON: {0}")]
    Decode(String),

    /// Path id is not a non-negative integer
    #[error("Invalid user ID: {0}")]
    InvalidId(String),
}

impl ProfileError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::Validation(_) | ProfileError::Decode(_) | ProfileError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ProfileError::NotFound(_) => StatusCode::NOT_FOUND,
            ProfileError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ProfileError::Store(err) => {
                error!(error = %err, "store operation failed");
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the profile service.
pub type Result<T> = std::result::Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ProfileError::from(ValidationError::InvalidEmail).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProfileError::Decode("eof".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProfileError::InvalidId("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ProfileError::NotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ProfileError::from(StoreError::ConstraintViolation("dup".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pool_timeout_is_connection_failure() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[test]
    fn test_row_not_found_is_query_failure() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::QueryFailure(_)));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ProfileError::from(ValidationError::BioRejected);
        assert_eq!(err.to_string(), "bio contains disallowed content");
    }
}
