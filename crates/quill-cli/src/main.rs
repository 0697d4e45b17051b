//! Quill CLI: ingest gallery batches and post thumbnails from local files.
//!
//! Reads DATABASE_URL, UPLOAD_ROOT and the other settings from the environment
//! (or a .env file).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quill_cli::{init_tracing, load_config, load_media_config, read_upload};
use quill_core::ErrorMetadata;
use quill_db::{setup_database, MediaRepository};
use quill_services::{
    IngestError, MediaIngestionService, MediaMetadata, MediaStatus, PostThumbnailService,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "quill", about = "Quill media ingestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a batch of images as one gallery media
    Upload {
        /// Media description
        #[arg(long)]
        description: String,
        /// Store the media as hidden
        #[arg(long)]
        hidden: bool,
        /// Image files, stored in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Create the thumbnail for a blog post
    PostThumbnail {
        /// Image file
        file: PathBuf,
    },
    /// Get a media item by ID
    Get {
        /// Media UUID
        id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn report(err: IngestError) -> anyhow::Error {
    tracing::debug!(error = ?err, "Command failed");
    anyhow::anyhow!("{} ({})", err.client_message(), err.error_code())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            description,
            hidden,
            files,
        } => {
            let config = load_config()?;
            let pool = setup_database(&config).await?;
            let repository = Arc::new(MediaRepository::new(pool));
            let service = MediaIngestionService::new(config.media.clone(), repository);

            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(read_upload(path).await?);
            }

            let status = if hidden {
                MediaStatus::Hidden
            } else {
                MediaStatus::Visible
            };
            let response = service
                .ingest(uploads, MediaMetadata::new(description, status))
                .await
                .map_err(report)?;
            print_json(&response)?;
        }
        Commands::PostThumbnail { file } => {
            let media = load_media_config()?;
            let service = PostThumbnailService::new(&media)
                .await
                .context("Failed to prepare thumbnail directory")?;
            let upload = read_upload(&file).await?;
            let name = service.create(upload).await.map_err(report)?;
            print_json(&serde_json::json!({ "thumbnail": name }))?;
        }
        Commands::Get { id } => {
            let config = load_config()?;
            let pool = setup_database(&config).await?;
            let repository = Arc::new(MediaRepository::new(pool));
            let service = MediaIngestionService::new(config.media.clone(), repository);
            let response = service.get_media(id).await.map_err(report)?;
            print_json(&response)?;
        }
    }

    Ok(())
}
