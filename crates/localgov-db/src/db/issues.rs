//! Issue repository: Postgres-backed `IssueStore`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use localgov_core::models::{
    Attachment, AttachmentRecord, Issue, IssuePriority, IssueStatus, NewIssue,
};
use localgov_core::{AppError, IssueStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::transaction::with_transaction;

/// Row type for the issues table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct IssueRow {
    id: Uuid,
    reporter_id: String,
    address: String,
    latitude: f64,
    longitude: f64,
    category_id: i32,
    description: String,
    status: i16,
    priority: i16,
    date_reported: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl IssueRow {
    fn into_issue(self, attachments: Vec<Attachment>) -> Result<Issue, AppError> {
        Ok(Issue {
            id: self.id,
            reporter_id: self.reporter_id,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            category_id: self.category_id,
            description: self.description,
            status: IssueStatus::try_from_i16(self.status)?,
            priority: IssuePriority::try_from_i16(self.priority)?,
            date_reported: self.date_reported,
            last_updated: self.last_updated,
            attachments,
        })
    }
}

/// Row type for the issue_attachments table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct AttachmentRow {
    id: Uuid,
    issue_id: Uuid,
    file_name: String,
    file_path: String,
    content_type: String,
    file_size_bytes: i64,
    uploaded_at: DateTime<Utc>,
}

impl AttachmentRow {
    fn into_attachment(self) -> Attachment {
        Attachment {
            id: self.id,
            issue_id: self.issue_id,
            file_name: self.file_name,
            file_path: self.file_path,
            content_type: self.content_type,
            file_size_bytes: self.file_size_bytes,
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Postgres implementation of `IssueStore`.
#[derive(Clone)]
pub struct PgIssueStore {
    pool: PgPool,
}

impl PgIssueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for PgIssueStore {
    #[tracing::instrument(skip(self, input), fields(db.table = "issues"))]
    async fn create_issue(&self, input: &NewIssue, reporter_id: &str) -> Result<Uuid, AppError> {
        let issue_id: Uuid = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO issues
                (reporter_id, address, latitude, longitude, category_id, description,
                 status, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(reporter_id)
        .bind(&input.address)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.category_id)
        .bind(&input.description)
        .bind(IssueStatus::New.as_i16())
        .bind(IssuePriority::Normal.as_i16())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(issue_id = %issue_id, reporter_id = %reporter_id, "Issue created");

        Ok(issue_id)
    }

    #[tracing::instrument(
        skip(self, records),
        fields(db.table = "issue_attachments", record_count = records.len())
    )]
    async fn add_attachments(
        &self,
        issue_id: Uuid,
        records: &[AttachmentRecord],
    ) -> Result<(), AppError> {
        if records.is_empty() {
            return Ok(());
        }

        let records = records.to_vec();
        with_transaction(&self.pool, |tx| {
            Box::pin(async move {
                for record in &records {
                    sqlx::query(
                        r#"
                        INSERT INTO issue_attachments
                            (issue_id, file_name, file_path, content_type,
                             file_size_bytes, uploaded_at)
                        VALUES ($1, $2, $3, $4, $5, $6)
                        "#,
                    )
                    .bind(issue_id)
                    .bind(&record.file_name)
                    .bind(&record.file_path)
                    .bind(&record.content_type)
                    .bind(record.file_size_bytes)
                    .bind(record.uploaded_at)
                    .execute(&mut **tx)
                    .await?;
                }

                sqlx::query("UPDATE issues SET last_updated = now() WHERE id = $1")
                    .bind(issue_id)
                    .execute(&mut **tx)
                    .await?;

                Ok(())
            })
        })
        .await?;

        tracing::info!(issue_id = %issue_id, "Attachment metadata batch committed");

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "issue_attachments"))]
    async fn list_attachment_names(&self, issue_id: Uuid) -> Result<HashSet<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar::<Postgres, String>(
            "SELECT file_name FROM issue_attachments WHERE issue_id = $1",
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "issues"))]
    async fn get_issue(&self, issue_id: Uuid) -> Result<Option<Issue>, AppError> {
        let row: Option<IssueRow> = sqlx::query_as::<Postgres, IssueRow>(
            r#"
            SELECT id, reporter_id, address, latitude, longitude, category_id,
                   description, status, priority, date_reported, last_updated
            FROM issues
            WHERE id = $1
            "#,
        )
        .bind(issue_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let attachments: Vec<AttachmentRow> = sqlx::query_as::<Postgres, AttachmentRow>(
            r#"
            SELECT id, issue_id, file_name, file_path, content_type,
                   file_size_bytes, uploaded_at
            FROM issue_attachments
            WHERE issue_id = $1
            ORDER BY uploaded_at, file_name
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await?;

        let attachments = attachments
            .into_iter()
            .map(AttachmentRow::into_attachment)
            .collect();

        Ok(Some(row.into_issue(attachments)?))
    }
}
