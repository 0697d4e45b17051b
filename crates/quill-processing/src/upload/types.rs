//! Types for the upload pipeline.

use bytes::Bytes;

/// One file as received from the client, before any validation.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Client-supplied name, untrusted
    pub filename: String,
    /// Declared content type, untrusted
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
