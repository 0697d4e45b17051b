//! Persistence seam for media records

use async_trait::async_trait;
use quill_core::models::{MediaRecord, NewMedia, NewMediaFile};
use quill_core::AppError;
use uuid::Uuid;

/// Storage of media records and their files
///
/// Implementations must write a media row and all of its file rows
/// atomically: either everything is visible afterwards or nothing is.
#[async_trait]
pub trait MediaPersistence: Send + Sync {
    /// Insert one media row plus one file row per entry of `files`, in one transaction.
    async fn save_media_with_files(
        &self,
        media: NewMedia,
        files: Vec<NewMediaFile>,
    ) -> Result<MediaRecord, AppError>;

    /// Load a media record with its files ordered by position.
    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError>;
}
