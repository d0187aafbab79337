use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// What to do with files that completed before a cancellation signal.
///
/// `KeepCompleted` persists metadata for every file that fully landed on
/// disk; `DiscardCompleted` deletes those files best-effort and persists
/// nothing. Per-file write failures are unaffected by this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    #[default]
    KeepCompleted,
    DiscardCompleted,
}

impl CancellationPolicy {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_lowercase().as_str() {
            "keep" | "keep_completed" => Ok(CancellationPolicy::KeepCompleted),
            "discard" | "discard_completed" => Ok(CancellationPolicy::DiscardCompleted),
            other => Err(AppError::InvalidInput(format!(
                "Unknown cancellation policy: {}",
                other
            ))),
        }
    }
}

/// Outcome of one issue submission.
///
/// Partial success is a normal, reportable outcome: `attachments_saved`
/// may be less than `files_submitted` without the submission failing.
/// Fatal conditions (invalid input, issue creation failure, metadata
/// commit failure) surface as `Err(AppError)` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub issue_id: Uuid,
    pub attachments_saved: usize,
    pub files_submitted: usize,
    pub files_failed: usize,
    pub cancelled: bool,
    pub message: String,
}
