#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use quill_core::models::{MediaFileRecord, MediaRecord, NewMedia, NewMediaFile};
use quill_core::{AppError, MediaConfig};
use quill_db::MediaPersistence;
use quill_services::MediaIngestionService;
use tempfile::TempDir;
use uuid::Uuid;

/// Persistence double backed by a map; can be told to fail every save.
#[derive(Default)]
pub struct InMemoryPersistence {
    records: Mutex<HashMap<Uuid, MediaRecord>>,
    fail_saves: AtomicBool,
}

impl InMemoryPersistence {
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaPersistence for InMemoryPersistence {
    async fn save_media_with_files(
        &self,
        media: NewMedia,
        files: Vec<NewMediaFile>,
    ) -> Result<MediaRecord, AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated database outage".to_string()));
        }

        let id = Uuid::new_v4();
        let record = MediaRecord {
            id,
            description: media.description,
            folder: media.folder,
            kind: media.kind,
            status: media.status,
            updated_at: Utc::now(),
            files: files
                .into_iter()
                .map(|f| MediaFileRecord {
                    id: Uuid::new_v4(),
                    media_id: id,
                    stored_filename: f.stored_filename,
                    short_description: String::new(),
                    size: f.size,
                    position: f.position,
                })
                .collect(),
        };

        self.records.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }
}

/// Ingestion service over a scratch upload root
pub struct TestApp {
    pub dir: TempDir,
    pub persistence: Arc<InMemoryPersistence>,
    pub service: MediaIngestionService,
}

impl TestApp {
    pub fn upload_root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

pub fn setup_test_app_with(configure: impl FnOnce(&mut MediaConfig)) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = MediaConfig::with_root(dir.path().join("uploads"));
    configure(&mut config);

    let persistence = Arc::new(InMemoryPersistence::default());
    let service = MediaIngestionService::new(config, persistence.clone());

    TestApp {
        dir,
        persistence,
        service,
    }
}

/// Directories directly under `root`; empty when `root` does not exist.
pub fn batch_dirs(root: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => Vec::new(),
    }
}
