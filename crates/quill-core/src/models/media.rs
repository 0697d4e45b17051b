use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// Longest accepted media description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Which TransformSpec set applies to an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum MediaKind {
    /// Gallery image with a small and a large preview
    Gallery = 1,
    /// Single post thumbnail
    PostThumbnail = 2,
}

/// Visibility of a media record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum MediaStatus {
    Visible = 1,
    Hidden = 2,
}

impl TryFrom<i16> for MediaKind {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MediaKind::Gallery),
            2 => Ok(MediaKind::PostThumbnail),
            other => Err(format!("Unknown media kind {}", other)),
        }
    }
}

impl TryFrom<i16> for MediaStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MediaStatus::Visible),
            2 => Ok(MediaStatus::Hidden),
            other => Err(format!(
                "Status must be 1 (visible) or 2 (hidden), got {}",
                other
            )),
        }
    }
}

/// Caller-supplied metadata accompanying an upload batch
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MediaMetadata {
    pub description: String,
    pub status: MediaStatus,
}

impl MediaMetadata {
    pub fn new(description: impl Into<String>, status: MediaStatus) -> Self {
        Self {
            description: description.into(),
            status,
        }
    }

    /// Collect every field violation; an empty result means the metadata is valid.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.description.trim().is_empty() {
            let mut err = ValidationError::new("required");
            err.message = Some(Cow::Borrowed("Short description is required"));
            errors.add("description", err);
        } else if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            let mut err = ValidationError::new("length");
            err.message = Some(Cow::Borrowed(
                "Short description must not exceed 500 characters",
            ));
            err.add_param(Cow::Borrowed("max"), &MAX_DESCRIPTION_LENGTH);
            errors.add("description", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Persisted media row with its files ordered by `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: Uuid,
    pub description: String,
    /// Batch directory name under the upload root
    pub folder: String,
    pub kind: MediaKind,
    pub status: MediaStatus,
    pub updated_at: DateTime<Utc>,
    pub files: Vec<MediaFileRecord>,
}

/// Persisted file row; `media_id` is the only link back to its media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaFileRecord {
    pub id: Uuid,
    pub media_id: Uuid,
    pub stored_filename: String,
    pub short_description: String,
    pub size: i64,
    pub position: i32,
}

/// Insert payload for the `media` table
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub description: String,
    pub folder: String,
    pub kind: MediaKind,
    pub status: MediaStatus,
}

/// Insert payload for the `media_file` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaFile {
    pub stored_filename: String,
    pub size: i64,
    pub position: i32,
}

/// Media response handed to controllers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub description: String,
    pub folder: String,
    pub kind: MediaKind,
    pub status: MediaStatus,
    pub updated_at: DateTime<Utc>,
    pub files: Vec<MediaFileResponse>,
}

/// One stored original plus the names of its derived thumbnails
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaFileResponse {
    pub id: Uuid,
    /// Original file name inside the media folder
    pub file: String,
    pub size: i64,
    pub position: i32,
    /// Derived file names inside `{folder}/thumbnail/`, one per configured transform
    pub thumbnails: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_valid() {
        let meta = MediaMetadata::new("Holiday pictures", MediaStatus::Visible);
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_metadata_blank_description() {
        let meta = MediaMetadata::new("   ", MediaStatus::Hidden);
        let errors = meta.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_metadata_description_too_long() {
        let meta = MediaMetadata::new("a".repeat(501), MediaStatus::Visible);
        assert!(meta.validate().is_err());

        let meta = MediaMetadata::new("a".repeat(500), MediaStatus::Visible);
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn test_status_from_code() {
        assert_eq!(MediaStatus::try_from(1), Ok(MediaStatus::Visible));
        assert_eq!(MediaStatus::try_from(2), Ok(MediaStatus::Hidden));
        assert!(MediaStatus::try_from(3).is_err());
    }
}
