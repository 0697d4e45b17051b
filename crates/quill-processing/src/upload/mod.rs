//! Upload input types.

mod types;

pub use types::UploadedFile;
