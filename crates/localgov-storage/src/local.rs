use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncRead;
use uuid::Uuid;

use crate::traits::{AttachmentStorage, StorageError, StorageResult};

/// Local filesystem storage implementation
///
/// Files for an issue live under `{base_path}/{issue_id}/{file_name}`.
#[derive(Clone)]
pub struct LocalAttachmentStorage {
    base_path: PathBuf,
}

impl LocalAttachmentStorage {
    /// Create a new LocalAttachmentStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for attachment storage
    ///   (e.g., "wwwroot/uploads/issues")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAttachmentStorage { base_path })
    }

    /// Validate a file name and resolve it to a filesystem path.
    ///
    /// File names must be bare names: separators and the dot-only
    /// traversal names would escape the issue's directory and are rejected
    /// outright. The name is joined as a single path component, so interior
    /// dot runs (`photo..jpg`) are legal.
    fn file_path(&self, issue_id: Uuid, file_name: &str) -> StorageResult<PathBuf> {
        if file_name.trim().is_empty() {
            return Err(StorageError::InvalidName("empty file name".to_string()));
        }
        if file_name == "."
            || file_name == ".."
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(StorageError::InvalidName(format!(
                "file name contains path components: {}",
                file_name
            )));
        }

        Ok(self.issue_dir(issue_id).join(file_name))
    }

    fn issue_dir(&self, issue_id: Uuid) -> PathBuf {
        self.base_path.join(issue_id.to_string())
    }

    /// Ensure parent directory exists
    async fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AttachmentStorage for LocalAttachmentStorage {
    async fn list_names(&self, issue_id: Uuid) -> StorageResult<HashSet<String>> {
        let dir = self.issue_dir(issue_id);

        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(HashSet::new());
        }

        let mut names = HashSet::new();
        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to list directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to read directory entry in {}: {}",
                dir.display(),
                e
            ))
        })? {
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }

        Ok(names)
    }

    async fn write_new(
        &self,
        issue_id: Uuid,
        file_name: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let path = self.file_path(issue_id, file_name)?;
        self.ensure_dir(&path).await?;

        let start = std::time::Instant::now();

        // Exclusive create: planning already guarantees a unique name, this
        // is the correctness backstop against concurrent submissions.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(path.display().to_string())
                } else {
                    StorageError::WriteFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            issue_id = %issue_id,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(bytes_copied)
    }

    async fn delete(&self, issue_id: Uuid, file_name: &str) -> StorageResult<()> {
        let path = self.file_path(issue_id, file_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            issue_id = %issue_id,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, issue_id: Uuid, file_name: &str) -> StorageResult<bool> {
        let path = self.file_path(issue_id, file_name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
