//! Quill Storage Library
//!
//! Local filesystem layout for uploaded media. Every upload batch gets its own
//! directory under the upload root:
//!
//! - **Originals**: `{upload_root}/{batch}/{stored_filename}`
//! - **Derived images**: `{upload_root}/{batch}/thumbnail/{hash}.{ext}`
//!
//! All paths are resolved lexically and must stay strictly inside the root.

pub mod directory;
pub mod error;

// Re-export commonly used types
pub use directory::{BatchDirectory, MediaDirectoryManager};
pub use error::{StorageError, StorageResult};
