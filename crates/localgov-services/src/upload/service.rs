//! Issue submission orchestration.
//!
//! Ties the pipeline stages together around persistence: validate input,
//! create the issue record, plan the uploads against the names already in
//! storage, execute the plans under the worker bound, then commit the
//! metadata for every file that landed in one transactional batch.

use std::sync::Arc;

use localgov_core::models::{CancellationPolicy, NewIssue, SubmissionResult};
use localgov_core::{AppConfig, AppError, IssueStore};
use localgov_storage::AttachmentStorage;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::executor::{execute_plans, DEFAULT_MAX_WORKERS};
use super::planner::build_upload_plans;
use super::types::{PlanSummary, RawUpload};

/// Pipeline knobs the orchestrator carries per instance.
#[derive(Debug, Clone, Copy)]
pub struct UploadSettings {
    pub max_parallel_uploads: usize,
    pub cancellation_policy: CancellationPolicy,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_parallel_uploads: DEFAULT_MAX_WORKERS,
            cancellation_policy: CancellationPolicy::default(),
        }
    }
}

impl UploadSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_parallel_uploads: config.max_parallel_uploads,
            cancellation_policy: config.upload_cancellation_policy,
        }
    }
}

/// Orchestrates one issue submission end to end.
///
/// The issue record is created before any file I/O, so attachments always
/// reference a persisted issue. Per-file write failures degrade the result
/// rather than failing the submission; invalid input, issue creation
/// failure, and metadata commit failure are fatal.
pub struct IssueSubmissionService {
    store: Arc<dyn IssueStore>,
    storage: Arc<dyn AttachmentStorage>,
    settings: UploadSettings,
}

impl IssueSubmissionService {
    pub fn new(
        store: Arc<dyn IssueStore>,
        storage: Arc<dyn AttachmentStorage>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            store,
            storage,
            settings,
        }
    }

    /// Submit a new issue with its attachment batch.
    ///
    /// Cancellation stops further file writes; what happens to files that
    /// already completed is governed by the configured cancellation policy.
    #[tracing::instrument(skip(self, input, files, cancel), fields(reporter_id = %reporter_id))]
    pub async fn submit(
        &self,
        input: NewIssue,
        reporter_id: &str,
        files: Vec<RawUpload>,
        cancel: CancellationToken,
    ) -> Result<SubmissionResult, AppError> {
        if reporter_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Reporter identifier cannot be empty".to_string(),
            ));
        }
        input.validate()?;

        let issue_id = self.store.create_issue(&input, reporter_id).await?;
        tracing::info!(issue_id = %issue_id, file_count = files.len(), "Issue created");

        // Seed uniqueness from what is already on disk so a retried
        // submission never clobbers earlier files.
        let existing = self
            .storage
            .list_names(issue_id)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let plan_outcome = build_upload_plans(files, &existing, issue_id);
        let summary = plan_outcome.summary;

        let mut outcome = execute_plans(
            self.storage.clone(),
            issue_id,
            plan_outcome.plans,
            self.settings.max_parallel_uploads,
            cancel,
        )
        .await;

        if outcome.cancelled
            && self.settings.cancellation_policy == CancellationPolicy::DiscardCompleted
        {
            for record in outcome.records.drain(..) {
                if let Err(e) = self.storage.delete(issue_id, &record.file_name).await {
                    tracing::warn!(
                        error = %e,
                        issue_id = %issue_id,
                        file_name = %record.file_name,
                        "Failed to discard completed attachment after cancellation"
                    );
                }
            }
        }

        if !outcome.records.is_empty() {
            if let Err(e) = self.store.add_attachments(issue_id, &outcome.records).await {
                // Files are on disk but their metadata is not; flag the
                // orphans for operators before surfacing the failure.
                tracing::error!(
                    error = %e,
                    issue_id = %issue_id,
                    orphaned_files = outcome.records.len(),
                    "Attachment metadata commit failed, files remain on disk"
                );
                return Err(e);
            }
        }

        let attachments_saved = outcome.records.len();
        let result = SubmissionResult {
            issue_id,
            attachments_saved,
            files_submitted: summary.total,
            files_failed: outcome.failed,
            cancelled: outcome.cancelled,
            message: build_message(&summary, attachments_saved, outcome.failed, outcome.cancelled),
        };

        tracing::info!(
            issue_id = %issue_id,
            attachments_saved = result.attachments_saved,
            files_submitted = result.files_submitted,
            files_failed = result.files_failed,
            cancelled = result.cancelled,
            "Issue submission finished"
        );

        Ok(result)
    }
}

fn build_message(
    summary: &PlanSummary,
    saved: usize,
    failed: usize,
    cancelled: bool,
) -> String {
    if cancelled {
        return format!(
            "Issue submitted; upload cancelled after {} of {} attachments",
            saved, summary.total
        );
    }
    if saved == summary.total {
        if summary.total == 0 {
            return "Issue submitted".to_string();
        }
        return format!("Issue submitted with {} attachments", saved);
    }

    let mut parts = Vec::new();
    if summary.skipped_empty > 0 {
        parts.push(format!("{} empty", summary.skipped_empty));
    }
    if summary.skipped_bad_name > 0 {
        parts.push(format!("{} unusable names", summary.skipped_bad_name));
    }
    if failed > 0 {
        parts.push(format!("{} failed", failed));
    }
    format!(
        "Issue submitted with {} of {} attachments ({})",
        saved,
        summary.total,
        parts.join(", ")
    )
}
