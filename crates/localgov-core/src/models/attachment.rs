use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted file attached to an issue.
///
/// A row exists if and only if the file was completely written to storage.
/// Orphan files left behind by failed runs are tolerated (and logged);
/// orphan rows are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub file_name: String,
    /// Relative storage path, e.g. `uploads/issues/{issue_id}/{file_name}`.
    pub file_path: String,
    pub content_type: String,
    pub file_size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Metadata for one successfully written file, produced by an upload
/// worker and persisted in a single batch at the end of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub file_name: String,
    pub file_path: String,
    pub content_type: String,
    pub file_size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}
