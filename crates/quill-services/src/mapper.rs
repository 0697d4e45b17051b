//! Record to response mapping
//!
//! Thumbnail names are never stored; they are recomputed here from each
//! file's stored name and the transform set of the media kind.

use quill_core::models::{MediaFileResponse, MediaRecord, MediaResponse, TransformSpec};
use quill_processing::derived_filenames;

pub fn to_response(record: &MediaRecord, specs: &[TransformSpec]) -> MediaResponse {
    let mut files: Vec<MediaFileResponse> = record
        .files
        .iter()
        .map(|file| MediaFileResponse {
            id: file.id,
            file: file.stored_filename.clone(),
            size: file.size,
            position: file.position,
            thumbnails: derived_filenames(&file.stored_filename, specs),
        })
        .collect();
    files.sort_by_key(|f| f.position);

    MediaResponse {
        id: record.id,
        description: record.description.clone(),
        folder: record.folder.clone(),
        kind: record.kind,
        status: record.status,
        updated_at: record.updated_at,
        files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quill_core::models::{MediaFileRecord, MediaKind, MediaStatus, ThumbnailMethod};
    use quill_processing::derived_filename;
    use uuid::Uuid;

    fn file(media_id: Uuid, name: &str, position: i32) -> MediaFileRecord {
        MediaFileRecord {
            id: Uuid::new_v4(),
            media_id,
            stored_filename: name.to_string(),
            short_description: String::new(),
            size: 42,
            position,
        }
    }

    #[test]
    fn test_to_response_recomputes_thumbnails_in_position_order() {
        let id = Uuid::new_v4();
        let record = MediaRecord {
            id,
            description: "Trip".to_string(),
            folder: "2024-05-01-12-00-00-deadbeef".to_string(),
            kind: MediaKind::Gallery,
            status: MediaStatus::Visible,
            updated_at: Utc::now(),
            files: vec![file(id, "b.png", 1), file(id, "a.jpg", 0)],
        };
        let specs = [
            TransformSpec::new(165, 100, ThumbnailMethod::Resize, 100),
            TransformSpec::new(600, 400, ThumbnailMethod::Resize, 100),
        ];

        let response = to_response(&record, &specs);
        assert_eq!(response.files.len(), 2);
        assert_eq!(response.files[0].file, "a.jpg");
        assert_eq!(response.files[1].file, "b.png");
        assert_eq!(
            response.files[0].thumbnails,
            vec![
                derived_filename("a.jpg", &specs[0]),
                derived_filename("a.jpg", &specs[1])
            ]
        );
        assert!(response.files[1].thumbnails[0].ends_with(".png"));
    }
}
