//! Quill Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! thumbnail presets shared by every Quill media component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, MediaConfig};
pub use error::{AppError, ErrorCategory, ErrorMetadata, LogLevel};
pub use models::{
    MediaFileRecord, MediaFileResponse, MediaKind, MediaMetadata, MediaRecord, MediaResponse,
    MediaStatus, NewMedia, NewMediaFile, ThumbnailMethod, TransformSpec, TransformSpecError,
};
