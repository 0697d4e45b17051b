//! Upload allow-lists and thumbnail presets

use crate::models::{ThumbnailMethod, TransformSpec};

/// Extensions accepted for uploads, lowercase without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Content types accepted for uploads.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Longest accepted client filename, in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Name of the derived-image subdirectory inside every batch directory.
pub const THUMBNAIL_DIR: &str = "thumbnail";

/// `chrono` format of the timestamp prefix of a batch directory name.
pub const BATCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;
pub const DEFAULT_MAX_FILE_COUNT: usize = 20;

/// Small and large gallery previews.
pub const DEFAULT_GALLERY_THUMBNAILS: [TransformSpec; 2] = [
    TransformSpec::new(165, 100, ThumbnailMethod::Resize, 100),
    TransformSpec::new(600, 400, ThumbnailMethod::Resize, 100),
];

pub const DEFAULT_POST_THUMBNAIL: TransformSpec =
    TransformSpec::new(220, 160, ThumbnailMethod::Resize, 100);

/// Content types accepted for a given extension. Unknown extensions get an empty list.
pub fn content_types_for_extension(extension: &str) -> &'static [&'static str] {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => &["image/jpeg", "image/jpg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        _ => &[],
    }
}
