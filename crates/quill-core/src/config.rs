//! Configuration module
//!
//! Settings are read from the environment once, at process start, into plain
//! structs. The ingestion pipeline only ever sees a [`MediaConfig`] value handed
//! to its constructor.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_GALLERY_THUMBNAILS, DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE_MB,
    DEFAULT_POST_THUMBNAIL,
};
use crate::models::{MediaKind, TransformSpec};

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Pipeline settings for media ingestion
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Root under which every batch directory is created
    pub upload_root: PathBuf,
    /// Flat directory holding post thumbnails
    pub thumbnail_root: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_file_count: usize,
    pub gallery_thumbnails: Vec<TransformSpec>,
    pub post_thumbnail: TransformSpec,
}

impl MediaConfig {
    /// Defaults rooted at `upload_root`, with post thumbnails in `upload_root/post-thumbnails`.
    pub fn with_root(upload_root: impl Into<PathBuf>) -> Self {
        let upload_root = upload_root.into();
        Self {
            thumbnail_root: upload_root.join("post-thumbnails"),
            upload_root,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            gallery_thumbnails: DEFAULT_GALLERY_THUMBNAILS.to_vec(),
            post_thumbnail: DEFAULT_POST_THUMBNAIL,
        }
    }

    /// Transform set applied to an upload of the given kind.
    pub fn specs_for(&self, kind: MediaKind) -> &[TransformSpec] {
        match kind {
            MediaKind::Gallery => &self.gallery_thumbnails,
            MediaKind::PostThumbnail => std::slice::from_ref(&self.post_thumbnail),
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let upload_root = PathBuf::from(
            env::var("UPLOAD_ROOT")
                .map_err(|_| anyhow::anyhow!("UPLOAD_ROOT must be set"))?,
        );
        let thumbnail_root = env::var("THUMBNAIL_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| upload_root.join("post-thumbnails"));

        let max_file_size_mb: usize = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let max_file_count = env::var("MAX_FILE_COUNT")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_COUNT.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_FILE_COUNT);

        // Malformed presets fail startup instead of falling back to defaults.
        let gallery_thumbnails = match env::var("GALLERY_THUMBNAILS") {
            Ok(raw) => TransformSpec::parse_list(&raw)
                .map_err(|e| anyhow::anyhow!("GALLERY_THUMBNAILS is invalid: {}", e))?,
            Err(_) => DEFAULT_GALLERY_THUMBNAILS.to_vec(),
        };

        let post_thumbnail = match env::var("POST_THUMBNAIL") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("POST_THUMBNAIL is invalid: {}", e))?,
            Err(_) => DEFAULT_POST_THUMBNAIL,
        };

        Ok(MediaConfig {
            upload_root,
            thumbnail_root,
            max_file_size_bytes: megabytes_to_bytes(max_file_size_mb)?,
            max_file_count,
            gallery_thumbnails,
            post_thumbnail,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_ROOT must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_file_count == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_COUNT must be greater than 0"));
        }

        if self.gallery_thumbnails.is_empty() {
            return Err(anyhow::anyhow!(
                "GALLERY_THUMBNAILS must contain at least one transform"
            ));
        }

        for spec in self
            .gallery_thumbnails
            .iter()
            .chain(std::iter::once(&self.post_thumbnail))
        {
            spec.validate()
                .map_err(|e| anyhow::anyhow!("Invalid thumbnail transform {}: {}", spec, e))?;
        }

        Ok(())
    }
}

/// Convert a megabyte limit to bytes, rejecting values that do not fit in `usize`.
fn megabytes_to_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", megabytes))
}

/// Application configuration: database access plus the media pipeline settings.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub media: MediaConfig,
}

impl Config {
    /// Load `.env` (if present) and read every setting from the environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            media: MediaConfig::from_env()?,
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }

        self.media.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }
}
