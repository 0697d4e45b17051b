//! Ingestion error taxonomy

use quill_core::{AppError, ErrorCategory, ErrorMetadata, LogLevel};
use quill_processing::{DeriveError, FilenameError, ValidationError};
use quill_storage::StorageError;
use uuid::Uuid;
use validator::ValidationErrors;

/// Cause of a failure while writing a batch to disk
#[derive(Debug, thiserror::Error)]
pub enum ProcessingFailure {
    #[error(transparent)]
    Filename(#[from] FilenameError),

    #[error(transparent)]
    Derive(#[from] DeriveError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProcessingFailure {
    pub fn is_security_violation(&self) -> bool {
        match self {
            ProcessingFailure::Filename(e) => e.is_security_violation(),
            ProcessingFailure::Storage(e) => e.is_security_violation(),
            ProcessingFailure::Derive(_) => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid media metadata: {0}")]
    InvalidMetadata(#[from] ValidationErrors),

    #[error("Upload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to create batch directory: {0}")]
    DirectoryCreation(#[source] StorageError),

    #[error("Media processing failed for {filename}: {source}")]
    MediaProcessingFailed {
        filename: String,
        #[source]
        source: ProcessingFailure,
    },

    #[error(transparent)]
    Persistence(AppError),

    #[error("Media {0} not found")]
    NotFound(Uuid),
}

impl ErrorMetadata for IngestError {
    fn http_status_code(&self) -> u16 {
        match self {
            IngestError::InvalidMetadata(_) | IngestError::Validation(_) => 400,
            IngestError::NotFound(_) => 404,
            IngestError::Persistence(e) => e.http_status_code(),
            IngestError::DirectoryCreation(_) | IngestError::MediaProcessingFailed { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            IngestError::NotFound(_) => "NOT_FOUND",
            IngestError::InvalidMetadata(_) => "INVALID_METADATA",
            _ => match self.category() {
                ErrorCategory::SecurityViolation => "SECURITY_VIOLATION",
                ErrorCategory::Validation => "VALIDATION_ERROR",
                ErrorCategory::IoFailure => "MEDIA_PROCESSING_FAILED",
                ErrorCategory::Persistence => "PERSISTENCE_ERROR",
            },
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::IoFailure | ErrorCategory::Persistence
        )
    }

    fn client_message(&self) -> String {
        match self {
            IngestError::InvalidMetadata(_) | IngestError::Validation(_) => self.to_string(),
            IngestError::NotFound(_) => self.to_string(),
            IngestError::Persistence(e) => e.client_message(),
            IngestError::DirectoryCreation(_) | IngestError::MediaProcessingFailed { .. }
                if self.category() == ErrorCategory::SecurityViolation =>
            {
                "Upload rejected".to_string()
            }
            IngestError::DirectoryCreation(_) | IngestError::MediaProcessingFailed { .. } => {
                "Failed to process uploaded media".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            IngestError::DirectoryCreation(_)
                | IngestError::MediaProcessingFailed { .. }
                | IngestError::Persistence(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self.category() {
            ErrorCategory::Validation => LogLevel::Debug,
            ErrorCategory::SecurityViolation => LogLevel::Warn,
            ErrorCategory::IoFailure | ErrorCategory::Persistence => LogLevel::Error,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            IngestError::InvalidMetadata(_) | IngestError::NotFound(_) => ErrorCategory::Validation,
            IngestError::Validation(e) if e.is_security_violation() => {
                ErrorCategory::SecurityViolation
            }
            IngestError::Validation(_) => ErrorCategory::Validation,
            IngestError::DirectoryCreation(e) if e.is_security_violation() => {
                ErrorCategory::SecurityViolation
            }
            IngestError::DirectoryCreation(_) => ErrorCategory::IoFailure,
            IngestError::MediaProcessingFailed { source, .. } if source.is_security_violation() => {
                ErrorCategory::SecurityViolation
            }
            IngestError::MediaProcessingFailed { .. } => ErrorCategory::IoFailure,
            IngestError::Persistence(_) => ErrorCategory::Persistence,
        }
    }
}

impl IngestError {
    /// Emit this error at the severity its category calls for.
    pub fn log(&self) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(error = %self, "Media ingestion rejected"),
            LogLevel::Warn => tracing::warn!(error = %self, "Media ingestion security violation"),
            LogLevel::Error => tracing::error!(error = %self, "Media ingestion failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_validation_is_security_violation() {
        let err = IngestError::Validation(ValidationError::InvalidFilename {
            index: 0,
            filename: "../x.jpg".to_string(),
            source: FilenameError::PathTraversal("../x.jpg".to_string()),
        });
        assert_eq!(err.category(), ErrorCategory::SecurityViolation);
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.error_code(), "SECURITY_VIOLATION");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_plain_validation_error() {
        let err = IngestError::Validation(ValidationError::EmptyBatch);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_processing_failure_is_io() {
        let err = IngestError::MediaProcessingFailed {
            filename: "a.png".to_string(),
            source: ProcessingFailure::Storage(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            ))),
        };
        assert_eq!(err.category(), ErrorCategory::IoFailure);
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to process uploaded media");
    }

    #[test]
    fn test_persistence_error_passes_through() {
        let err = IngestError::Persistence(AppError::Internal("connection reset".to_string()));
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert_eq!(err.log_level(), LogLevel::Error);
        assert_eq!(err.http_status_code(), 500);
        assert!(err.to_string().contains("connection reset"));
    }
}
