//! Issue persistence abstraction
//!
//! The upload pipeline never talks to a database directly; it goes through
//! this trait. `localgov-db` provides the Postgres implementation, and the
//! pipeline tests substitute in-memory fakes.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AttachmentRecord, Issue, NewIssue};

#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Create a new issue and return its generated identifier.
    ///
    /// The issue must be durable before this returns: attachments always
    /// reference an already-persisted issue.
    async fn create_issue(&self, input: &NewIssue, reporter_id: &str) -> Result<Uuid, AppError>;

    /// Persist attachment metadata in a single transactional batch.
    async fn add_attachments(
        &self,
        issue_id: Uuid,
        records: &[AttachmentRecord],
    ) -> Result<(), AppError>;

    /// Names of attachments already recorded for this issue.
    async fn list_attachment_names(&self, issue_id: Uuid) -> Result<HashSet<String>, AppError>;

    /// Fetch an issue with its attachments.
    async fn get_issue(&self, issue_id: Uuid) -> Result<Option<Issue>, AppError>;
}
