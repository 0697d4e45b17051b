//! Media ingestion
//!
//! One call to [`MediaIngestionService::ingest`] moves a batch through
//! validate, create directory, save files and persist. Once the batch
//! directory exists, any failure deletes everything written so far before the
//! error is returned, so a media row exists exactly when its files do.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use quill_core::models::{MediaKind, MediaMetadata, MediaResponse, NewMedia, NewMediaFile};
use quill_core::MediaConfig;
use quill_db::MediaPersistence;
use quill_processing::{
    derived_filename, sanitize, split_extension, ThumbnailDeriver, UploadValidator, UploadedFile,
};
use quill_storage::{BatchDirectory, MediaDirectoryManager};
use uuid::Uuid;

use crate::error::{IngestError, ProcessingFailure};
use crate::mapper::to_response;

/// A file that made it to disk in the current batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub stored_filename: String,
    pub size: usize,
}

pub struct MediaIngestionService {
    config: MediaConfig,
    validator: UploadValidator,
    directories: MediaDirectoryManager,
    persistence: Arc<dyn MediaPersistence>,
}

impl MediaIngestionService {
    pub fn new(config: MediaConfig, persistence: Arc<dyn MediaPersistence>) -> Self {
        Self {
            validator: UploadValidator::new(config.max_file_size_bytes, config.max_file_count),
            directories: MediaDirectoryManager::new(&config.upload_root),
            config,
            persistence,
        }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Ingest a batch of gallery images.
    ///
    /// Files are stored and persisted in the given order; `position` of each
    /// file record is its index in `files`.
    #[tracing::instrument(skip(self, files, metadata), fields(file_count = files.len()))]
    pub async fn ingest(
        &self,
        files: Vec<UploadedFile>,
        metadata: MediaMetadata,
    ) -> Result<MediaResponse, IngestError> {
        let kind = MediaKind::Gallery;

        // Validation happens before any disk access
        if let Err(e) = metadata.validate() {
            let err = IngestError::InvalidMetadata(e);
            err.log();
            return Err(err);
        }
        if let Err(e) = self.validator.validate(&files) {
            let err = IngestError::Validation(e);
            err.log();
            return Err(err);
        }

        let batch_name = MediaDirectoryManager::generate_batch_name();
        let batch = self
            .directories
            .create_batch_directory(&batch_name)
            .await
            .map_err(|e| {
                let err = IngestError::DirectoryCreation(e);
                err.log();
                err
            })?;

        let mut written = Vec::new();
        let processed = match self.save_files(&batch, &files, kind, &mut written).await {
            Ok(processed) => processed,
            Err(err) => {
                err.log();
                self.rollback(&batch, &written).await;
                return Err(err);
            }
        };

        let media = NewMedia {
            description: metadata.description,
            folder: batch.name.clone(),
            kind,
            status: metadata.status,
        };
        let media_files: Vec<NewMediaFile> = processed
            .iter()
            .enumerate()
            .map(|(position, file)| NewMediaFile {
                stored_filename: file.stored_filename.clone(),
                size: file.size as i64,
                position: position as i32,
            })
            .collect();

        let record = match self
            .persistence
            .save_media_with_files(media, media_files)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                let err = IngestError::Persistence(e);
                err.log();
                self.rollback(&batch, &written).await;
                return Err(err);
            }
        };

        tracing::info!(
            media_id = %record.id,
            folder = %record.folder,
            file_count = record.files.len(),
            "Media ingested"
        );

        Ok(to_response(&record, self.config.specs_for(record.kind)))
    }

    /// Load a media record; thumbnail names are recomputed, never read back.
    #[tracing::instrument(skip(self))]
    pub async fn get_media(&self, id: Uuid) -> Result<MediaResponse, IngestError> {
        let record = self
            .persistence
            .get_media(id)
            .await
            .map_err(IngestError::Persistence)?
            .ok_or(IngestError::NotFound(id))?;

        Ok(to_response(&record, self.config.specs_for(record.kind)))
    }

    /// Write derived images then the original for each file, in order.
    ///
    /// Every path written is appended to `written` as soon as it exists, so the
    /// caller can undo a partially saved batch.
    async fn save_files(
        &self,
        batch: &BatchDirectory,
        files: &[UploadedFile],
        kind: MediaKind,
        written: &mut Vec<PathBuf>,
    ) -> Result<Vec<ProcessedFile>, IngestError> {
        let specs = self.config.specs_for(kind).to_vec();
        let mut used_names = HashSet::new();
        let mut processed = Vec::with_capacity(files.len());

        for file in files {
            let fail = |source: ProcessingFailure| IngestError::MediaProcessingFailed {
                filename: file.filename.clone(),
                source,
            };

            let sanitized = sanitize(&file.filename).map_err(|e| fail(e.into()))?;
            let stored_filename = unique_name(&sanitized, &mut used_names);
            let extension = split_extension(&stored_filename).1.unwrap_or_default();

            let derived =
                ThumbnailDeriver::derive_all_blocking(file.data.clone(), extension, specs.clone())
                    .await
                    .map_err(|e| fail(e.into()))?;

            for image in &derived {
                let name = derived_filename(&stored_filename, &image.spec);
                let path = self
                    .directories
                    .write_file(&batch.thumbnail_path, &name, &image.data)
                    .await
                    .map_err(|e| fail(e.into()))?;
                written.push(path);
            }

            let path = self
                .directories
                .write_file(&batch.path, &stored_filename, &file.data)
                .await
                .map_err(|e| fail(e.into()))?;
            written.push(path);

            tracing::debug!(
                original = %file.filename,
                stored = %stored_filename,
                thumbnails = derived.len(),
                "Saved media file"
            );

            processed.push(ProcessedFile {
                stored_filename,
                size: file.data.len(),
            });
        }

        Ok(processed)
    }

    /// Best-effort removal of everything written for `batch`. Never fails.
    async fn rollback(&self, batch: &BatchDirectory, written: &[PathBuf]) {
        for path in written.iter().rev() {
            if let Err(e) = self.directories.remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove file during rollback");
            }
        }

        self.directories.cleanup_directory(&batch.thumbnail_path).await;
        self.directories.cleanup_directory(&batch.path).await;

        tracing::info!(
            folder = %batch.name,
            removed_files = written.len(),
            "Rolled back media batch"
        );
    }
}

/// Return `name`, or `stem-N.ext` with the smallest free `N`, and mark it as used.
fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, extension) = split_extension(name);
    let mut counter = 1;
    loop {
        let candidate = match &extension {
            Some(ext) => format!("{}-{}.{}", stem, counter, ext),
            None => format!("{}-{}", stem, counter),
        };
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_suffixes_collisions() {
        let mut used = HashSet::new();
        assert_eq!(unique_name("photo.jpg", &mut used), "photo.jpg");
        assert_eq!(unique_name("photo.jpg", &mut used), "photo-1.jpg");
        assert_eq!(unique_name("photo.jpg", &mut used), "photo-2.jpg");
        assert_eq!(unique_name("photo-1.jpg", &mut used), "photo-1-1.jpg");
        assert_eq!(unique_name("other.png", &mut used), "other.png");
    }
}
