use std::path::Path;

use anyhow::Context;
use quill_core::constants::content_types_for_extension;
use quill_core::{Config, MediaConfig};
use quill_processing::{split_extension, UploadedFile};

/// Content type to declare for a local file, guessed from its extension.
pub fn content_type_for_name(name: &str) -> Option<String> {
    let (_, extension) = split_extension(name);
    extension
        .and_then(|ext| content_types_for_extension(&ext).first().copied())
        .map(str::to_string)
}

/// Read a local file into an upload, keeping only its final path component as the name.
pub async fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let content_type = content_type_for_name(&filename);
    Ok(UploadedFile::new(filename, content_type, data))
}

/// Full configuration, for commands that talk to the database.
pub fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Media settings only; `DATABASE_URL` is not required.
pub fn load_media_config() -> anyhow::Result<MediaConfig> {
    dotenvy::dotenv().ok();
    let media = MediaConfig::from_env().context("Failed to load media configuration")?;
    media.validate().context("Invalid media configuration")?;
    Ok(media)
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
