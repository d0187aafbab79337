//! Domain models

pub mod attachment;
pub mod issue;
pub mod submission;

pub use attachment::{Attachment, AttachmentRecord};
pub use issue::{Issue, IssuePriority, IssueStatus, NewIssue};
pub use submission::{CancellationPolicy, SubmissionResult};
