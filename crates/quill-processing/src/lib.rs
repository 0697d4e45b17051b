//! Quill processing library
//!
//! Pure, side-effect-free building blocks of the ingestion pipeline:
//! filename sanitizing, upload validation, content-hash naming and
//! thumbnail derivation.

pub mod hasher;
pub mod sanitizer;
pub mod upload;
pub mod validator;

#[cfg(feature = "image")]
pub mod image;

pub use hasher::{content_hash, derived_filename, derived_filenames};
pub use sanitizer::{sanitize, split_extension, FilenameError};
pub use upload::UploadedFile;
pub use validator::{UploadValidator, ValidationError};

#[cfg(feature = "image")]
pub use image::{DeriveError, ThumbnailDeriver};
