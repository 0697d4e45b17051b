use crate::error::{StorageError, StorageResult};
use chrono::Utc;
use quill_core::constants::{BATCH_TIMESTAMP_FORMAT, THUMBNAIL_DIR};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// A freshly created, empty batch directory and its derived-image subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDirectory {
    pub name: String,
    pub path: PathBuf,
    pub thumbnail_path: PathBuf,
}

/// Per-batch directory management under a fixed root
#[derive(Debug, Clone)]
pub struct MediaDirectoryManager {
    root: PathBuf,
}

impl MediaDirectoryManager {
    /// Create a manager for `root`. Nothing touches the disk until the first call.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Batch name: second-precision UTC timestamp plus an 8-hex random suffix.
    pub fn generate_batch_name() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}",
            Utc::now().format(BATCH_TIMESTAMP_FORMAT),
            &suffix[..8]
        )
    }

    /// Create the root (recursively) if it does not exist yet.
    pub async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::CreateFailed {
                path: self.root.display().to_string(),
                source,
            })
    }

    /// Create `root/batch_name` and its `thumbnail` subdirectory, both empty.
    ///
    /// The batch directory itself is created non-recursively, so an existing
    /// directory of the same name is an error rather than silently shared.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn create_batch_directory(&self, batch_name: &str) -> StorageResult<BatchDirectory> {
        let path = match resolve_within(&self.root, batch_name) {
            Ok(path) => path,
            Err(e) => {
                if e.is_security_violation() {
                    tracing::warn!(batch_name = %batch_name, error = %e, "Rejected batch directory name");
                }
                return Err(e);
            }
        };

        self.ensure_root().await?;

        fs::create_dir(&path)
            .await
            .map_err(|source| StorageError::CreateFailed {
                path: path.display().to_string(),
                source,
            })?;

        let thumbnail_path = path.join(THUMBNAIL_DIR);
        if let Err(source) = fs::create_dir(&thumbnail_path).await {
            self.cleanup_directory(&path).await;
            return Err(StorageError::CreateFailed {
                path: thumbnail_path.display().to_string(),
                source,
            });
        }

        tracing::info!(path = %path.display(), "Created batch directory");

        Ok(BatchDirectory {
            name: batch_name.to_string(),
            path,
            thumbnail_path,
        })
    }

    /// Remove `path` if, and only if, it is an empty directory inside the root.
    ///
    /// Never fails: problems are logged. A non-empty directory is left in place.
    pub async fn cleanup_directory(&self, path: &Path) {
        let path = normalize(path);
        if path == self.root || !path.starts_with(&self.root) {
            tracing::warn!(path = %path.display(), "Refusing to clean up directory outside storage root");
            return;
        }

        match fs::remove_dir(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Directory not removed (not empty or not accessible)"
            ),
        }
    }

    /// Write `data` to `dir/filename` and flush it to disk.
    ///
    /// Data goes to a temporary sibling first and is renamed into place, so a
    /// failed write never leaves a partial file under the final name.
    pub async fn write_file(&self, dir: &Path, filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = resolve_within(dir, filename)?;
        self.ensure_within_root(&path)?;

        let tmp_path = path.with_file_name(format!(".{}.part", Uuid::new_v4().simple()));
        let start = std::time::Instant::now();

        let result = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, &path).await
        }
        .await;

        if let Err(source) = result {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %tmp_path.display(), error = %e, "Failed to remove partial file");
                }
            }
            return Err(StorageError::WriteFailed {
                path: path.display().to_string(),
                source,
            });
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File written"
        );

        Ok(path)
    }

    /// Delete a file inside the root. A file that is already gone counts as deleted.
    pub async fn remove_file(&self, path: &Path) -> StorageResult<()> {
        let path = normalize(path);
        self.ensure_within_root(&path)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::DeleteFailed {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn ensure_within_root(&self, path: &Path) -> StorageResult<()> {
        let path = normalize(path);
        if path != self.root && path.starts_with(&self.root) {
            Ok(())
        } else {
            Err(StorageError::DirectoryTraversal(path.display().to_string()))
        }
    }
}

/// Join `name` onto `base` and require the result to be a direct child of `base`.
///
/// Names containing `..`, `/` or `\` are rejected outright, whatever the
/// platform's separator. The remaining check is lexical (`.` is folded without
/// touching the disk), so it also works for paths that do not exist yet.
pub fn resolve_within(base: &Path, name: &str) -> StorageResult<PathBuf> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("empty name".to_string()));
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(StorageError::DirectoryTraversal(name.to_string()));
    }

    let base = normalize(base);
    let candidate = normalize(&base.join(name));

    if candidate == base || !candidate.starts_with(&base) {
        return Err(StorageError::DirectoryTraversal(name.to_string()));
    }

    if candidate.parent() != Some(base.as_path()) {
        return Err(StorageError::InvalidName(name.to_string()));
    }

    Ok(candidate)
}

/// Fold `.` and `..` components. `..` never climbs above the path's root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
