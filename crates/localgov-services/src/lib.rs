//! Localgov Services Layer
//!
//! This crate is the **business service layer**: it hosts the issue
//! submission pipeline (sequential upload planning, bounded-concurrency
//! execution against the storage backend, and the orchestrator that ties
//! issue creation, file writes, and metadata persistence together). Keep
//! coordination logic here; persistence lives behind the `IssueStore`
//! trait and file I/O behind `AttachmentStorage`.

pub mod upload;

pub use upload::executor::{execute_plans, DEFAULT_MAX_WORKERS};
pub use upload::planner::build_upload_plans;
pub use upload::service::{IssueSubmissionService, UploadSettings};
pub use upload::types::{ExecutionOutcome, PlanOutcome, PlanSummary, RawUpload, UploadPlan};
