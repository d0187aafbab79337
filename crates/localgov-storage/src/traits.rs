//! Storage abstraction trait
//!
//! All attachment storage backends must implement this trait. Files live
//! in a per-issue namespace; writes are exclusive-create so a name can
//! never be silently overwritten even if two submissions race.

use std::collections::HashSet;
use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Attachment storage abstraction
///
/// Backends expose a flat namespace per issue. The pipeline lists the
/// existing names once before planning, streams each planned file through
/// `write_new`, and deletes partial files after a failed or aborted write.
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Names of files already stored for this issue.
    ///
    /// An issue with no stored attachments yields an empty set; this is
    /// not an error.
    async fn list_names(&self, issue_id: Uuid) -> StorageResult<HashSet<String>>;

    /// Stream a file into the issue's namespace under `file_name`.
    ///
    /// The target is opened with exclusive create: if a file with this
    /// name already exists the call fails with `AlreadyExists` rather than
    /// overwriting. The reader is consumed until EOF in chunks, so large
    /// files are never held in memory. Returns the number of bytes
    /// written.
    async fn write_new(
        &self,
        issue_id: Uuid,
        file_name: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Delete a stored file. Deleting a file that does not exist is a
    /// no-op, so cleanup after a failed write can always run.
    async fn delete(&self, issue_id: Uuid, file_name: &str) -> StorageResult<()>;

    /// Check whether a file exists in the issue's namespace.
    async fn exists(&self, issue_id: Uuid, file_name: &str) -> StorageResult<bool>;
}
