//! Quill Services Layer
//!
//! Orchestration of the media pipeline: validation, batch directory
//! creation, thumbnail derivation, persistence and rollback. Controllers
//! depend on this crate only and translate [`IngestError`] through
//! [`quill_core::ErrorMetadata`].

pub mod error;
pub mod ingestion;
pub mod mapper;
pub mod post_thumbnail;

pub use error::{IngestError, ProcessingFailure};
pub use ingestion::{MediaIngestionService, ProcessedFile};
pub use mapper::to_response;
pub use post_thumbnail::PostThumbnailService;

// Re-exports so callers need a single dependency
pub use quill_core::{MediaConfig, MediaMetadata, MediaResponse, MediaStatus};
pub use quill_db::MediaPersistence;
pub use quill_processing::UploadedFile;
