//! Storage operation errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Path escapes storage root: {0}")]
    DirectoryTraversal(String),

    #[error("Invalid path component: {0}")]
    InvalidName(String),

    #[error("Failed to create directory {path}: {source}")]
    CreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error was caused by a path trying to leave the storage root.
    pub fn is_security_violation(&self) -> bool {
        matches!(
            self,
            StorageError::DirectoryTraversal(_) | StorageError::InvalidName(_)
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
