//! Error types module
//!
//! [`AppError`] is what the persistence layer returns. [`ErrorMetadata`] is
//! implemented by every error that reaches a caller, so request handlers can
//! translate it without matching on variants.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for suspicious input such as path traversal attempts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Failure class of an error, used to decide cleanup and retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; nothing was written, safe to retry after fixing the input.
    Validation,
    /// Malicious-looking input (path traversal and similar); never retried.
    SecurityViolation,
    /// Disk or encoder failure after the batch directory existed.
    IoFailure,
    /// Database failure after files were written.
    Persistence,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Failure class
    fn category(&self) -> ErrorCategory;
}

/// Failure reported by the persistence layer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// A unique constraint rejected the write, e.g. a reused media folder name
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        let conflict = err
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .map(|db| db.message().to_string());

        match conflict {
            Some(message) => AppError::Conflict(message),
            None => AppError::Database(err),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Conflict(_) => 409,
            AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// A conflicting folder name is regenerated on the next attempt, so every
    /// persistence failure may be retried.
    fn is_recoverable(&self) -> bool {
        true
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Conflict(_) => {
                "Failed to save media record".to_string()
            }
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        true
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Conflict(_) => LogLevel::Warn,
            AppError::Database(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to save media record");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert_eq!(err.category(), ErrorCategory::Persistence);
    }

    #[test]
    fn test_conflict_is_reported_as_409() {
        let err = AppError::Conflict("duplicate key value violates unique constraint".to_string());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(!err.client_message().contains("duplicate"));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal("Transaction already finished".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.category(), ErrorCategory::Persistence);
    }
}
