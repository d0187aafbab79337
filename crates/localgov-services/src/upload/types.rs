//! Pipeline data types

use std::fmt;
use std::io::Cursor;
use std::pin::Pin;

use bytes::Bytes;
use localgov_core::models::AttachmentRecord;
use tokio::io::AsyncRead;

/// Readable source of one incoming file's bytes.
pub type FileReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// One file handed in by the caller boundary, before any validation.
pub struct RawUpload {
    pub file_name: String,
    pub content_type: String,
    /// Declared length in bytes; zero or negative marks the file empty.
    pub size_bytes: i64,
    pub reader: FileReader,
}

impl RawUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: i64,
        reader: FileReader,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
            reader,
        }
    }

    /// Build an upload from an in-memory payload.
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        let size_bytes = data.len() as i64;
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
            reader: Box::pin(Cursor::new(data)),
        }
    }
}

impl fmt::Debug for RawUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// A planned, not-yet-executed write of one file.
///
/// Created by the planner, consumed exactly once by exactly one worker.
/// The final name and paths are fixed here, which is why execution order
/// across workers has no observable effect.
pub struct UploadPlan {
    pub file: RawUpload,
    pub final_name: String,
    /// Relative storage reference, e.g. `uploads/issues/{issue_id}/{name}`.
    pub relative_path: String,
}

/// Rejection tallies from the planning stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub total: usize,
    pub accepted: usize,
    pub skipped_empty: usize,
    pub skipped_bad_name: usize,
}

/// Output of the planning stage: plans in submission order plus tallies.
pub struct PlanOutcome {
    pub plans: Vec<UploadPlan>,
    pub summary: PlanSummary,
}

/// Result of draining a plan batch through the worker pool.
///
/// `cancelled` is distinct from the failure count: callers may treat
/// cancellation as fatal for the whole submission while ordinary per-file
/// failures are not.
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    pub records: Vec<AttachmentRecord>,
    pub failed: usize,
    pub cancelled: bool,
}
