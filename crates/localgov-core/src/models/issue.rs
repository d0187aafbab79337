use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::attachment::Attachment;
use crate::error::AppError;

/// Issue workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            IssueStatus::New => 1,
            IssueStatus::InProgress => 2,
            IssueStatus::Resolved => 3,
            IssueStatus::Closed => 4,
        }
    }

    pub fn try_from_i16(value: i16) -> Result<Self, AppError> {
        match value {
            1 => Ok(IssueStatus::New),
            2 => Ok(IssueStatus::InProgress),
            3 => Ok(IssueStatus::Resolved),
            4 => Ok(IssueStatus::Closed),
            other => Err(AppError::InvalidInput(format!(
                "Unknown issue status code: {}",
                other
            ))),
        }
    }
}

/// Issue priority. Lower codes are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    High,
    Normal,
    Low,
}

impl IssuePriority {
    pub fn as_i16(self) -> i16 {
        match self {
            IssuePriority::High => 1,
            IssuePriority::Normal => 3,
            IssuePriority::Low => 5,
        }
    }

    pub fn try_from_i16(value: i16) -> Result<Self, AppError> {
        match value {
            1 => Ok(IssuePriority::High),
            3 => Ok(IssuePriority::Normal),
            5 => Ok(IssuePriority::Low),
            other => Err(AppError::InvalidInput(format!(
                "Unknown issue priority code: {}",
                other
            ))),
        }
    }
}

/// A citizen-submitted infrastructure issue report.
///
/// Created once at submission start, before any attachment I/O; the upload
/// pipeline only ever appends attachments afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub reporter_id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: i32,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub date_reported: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub attachments: Vec<Attachment>,
}

/// Submission input for a new issue, before it has an identifier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewIssue {
    #[validate(length(min = 1, max = 200, message = "Address must be 1-200 characters"))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,

    #[validate(range(min = 1, message = "Please select a category"))]
    pub category_id: i32,

    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
}
