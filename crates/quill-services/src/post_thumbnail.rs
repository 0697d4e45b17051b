use quill_core::models::TransformSpec;
use quill_core::MediaConfig;
use quill_processing::{
    derived_filename, sanitize, split_extension, ThumbnailDeriver, UploadValidator, UploadedFile,
};
use quill_storage::{MediaDirectoryManager, StorageError};

use crate::error::{IngestError, ProcessingFailure};

/// Post thumbnails live flat in one directory, named by content hash.
pub struct PostThumbnailService {
    spec: TransformSpec,
    validator: UploadValidator,
    directories: MediaDirectoryManager,
}

impl PostThumbnailService {
    /// Create the service, creating the thumbnail directory if it is missing.
    pub async fn new(config: &MediaConfig) -> Result<Self, StorageError> {
        let directories = MediaDirectoryManager::new(&config.thumbnail_root);
        directories.ensure_root().await?;

        tracing::info!(
            path = %directories.root().display(),
            spec = %config.post_thumbnail,
            "Post thumbnail directory ready"
        );

        Ok(Self {
            spec: config.post_thumbnail,
            validator: UploadValidator::new(config.max_file_size_bytes, 1),
            directories,
        })
    }

    /// Derive and store the post thumbnail for `file`; returns the stored name.
    #[tracing::instrument(skip(self, file), fields(filename = %file.filename))]
    pub async fn create(&self, file: UploadedFile) -> Result<String, IngestError> {
        if let Err(e) = self.validator.validate_file(0, &file) {
            let err = IngestError::Validation(e);
            err.log();
            return Err(err);
        }

        let fail = |source: ProcessingFailure| {
            let err = IngestError::MediaProcessingFailed {
                filename: file.filename.clone(),
                source,
            };
            err.log();
            err
        };

        let sanitized = sanitize(&file.filename).map_err(|e| fail(e.into()))?;
        let extension = split_extension(&sanitized).1.unwrap_or_default();

        let derived =
            ThumbnailDeriver::derive_all_blocking(file.data.clone(), extension, vec![self.spec])
                .await
                .map_err(|e| fail(e.into()))?;

        let name = self.thumbnail_name(&sanitized);
        for image in &derived {
            self.directories
                .write_file(self.directories.root(), &name, &image.data)
                .await
                .map_err(|e| fail(e.into()))?;
        }

        tracing::info!(original = %file.filename, thumbnail = %name, "Created post thumbnail");

        Ok(name)
    }

    /// Name of the post thumbnail derived from a sanitized file name.
    pub fn thumbnail_name(&self, sanitized_filename: &str) -> String {
        derived_filename(sanitized_filename, &self.spec)
    }
}
