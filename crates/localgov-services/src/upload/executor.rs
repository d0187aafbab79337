//! Bounded-concurrency upload execution.
//!
//! A fixed-size pool of worker tasks drains planned uploads from a shared
//! FIFO queue and streams each file to storage. The only shared mutable
//! state is the queue and the append-only record collector; no lock is
//! held during file I/O. One plan failing never aborts its siblings: the
//! worker cleans up the partial file, bumps the failure tally, and moves
//! on to the next plan.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use localgov_core::models::AttachmentRecord;
use localgov_storage::{AttachmentStorage, StorageError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::types::{ExecutionOutcome, UploadPlan};

/// Hard cap on simultaneous attachment writes for one submission.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Drain the planned uploads across at most `max_workers` concurrent
/// workers, writing each file to storage and collecting metadata records
/// for the ones that fully landed.
///
/// Cancellation is cooperative: workers observe the token between plans
/// and abort an in-flight copy via `select!`, cleaning up the partial
/// file the same way as any other failure. The returned outcome reports
/// cancellation separately from the per-file failure count.
pub async fn execute_plans(
    storage: Arc<dyn AttachmentStorage>,
    issue_id: Uuid,
    plans: Vec<UploadPlan>,
    max_workers: usize,
    cancel: CancellationToken,
) -> ExecutionOutcome {
    if plans.is_empty() {
        return ExecutionOutcome {
            cancelled: cancel.is_cancelled(),
            ..ExecutionOutcome::default()
        };
    }

    let worker_count = max_workers.max(1).min(plans.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(plans)));
    let records = Arc::new(Mutex::new(Vec::new()));
    let failed = Arc::new(AtomicUsize::new(0));

    tracing::debug!(
        issue_id = %issue_id,
        worker_count = worker_count,
        "Starting upload workers"
    );

    let mut handles = Vec::with_capacity(worker_count);
    for worker_id in 1..=worker_count {
        let storage = storage.clone();
        let queue = queue.clone();
        let records = records.clone();
        let failed = failed.clone();
        let cancel = cancel.clone();

        handles.push(tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                // Pop under the lock, write without it.
                let plan = { queue.lock().await.pop_front() };
                let Some(plan) = plan else {
                    break;
                };

                let UploadPlan {
                    file,
                    final_name,
                    relative_path,
                } = plan;

                let write = storage.write_new(issue_id, &final_name, file.reader);
                let result = tokio::select! {
                    _ = cancel.cancelled() => None,
                    res = write => Some(res),
                };

                match result {
                    Some(Ok(bytes_written)) => {
                        records.lock().await.push(AttachmentRecord {
                            file_name: final_name.clone(),
                            file_path: relative_path,
                            content_type: file.content_type,
                            file_size_bytes: bytes_written as i64,
                            uploaded_at: Utc::now(),
                        });
                        tracing::debug!(
                            worker_id = worker_id,
                            issue_id = %issue_id,
                            file_name = %final_name,
                            size_bytes = bytes_written,
                            "Attachment written"
                        );
                    }
                    Some(Err(e)) => {
                        tracing::error!(
                            error = %e,
                            issue_id = %issue_id,
                            file_name = %final_name,
                            "Failed to save attachment"
                        );
                        // An exclusive-create refusal means the write never
                        // started and the existing file is not ours to delete.
                        if !matches!(e, StorageError::AlreadyExists(_)) {
                            remove_partial(storage.as_ref(), issue_id, &final_name).await;
                        }
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                    None => {
                        tracing::warn!(
                            issue_id = %issue_id,
                            file_name = %final_name,
                            "Attachment write aborted by cancellation"
                        );
                        remove_partial(storage.as_ref(), issue_id, &final_name).await;
                        break;
                    }
                }
            }
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, issue_id = %issue_id, "Upload worker panicked");
            failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    let records = std::mem::take(&mut *records.lock().await);
    ExecutionOutcome {
        records,
        failed: failed.load(Ordering::Relaxed),
        cancelled: cancel.is_cancelled(),
    }
}

/// Best-effort cleanup of a partially written file. Deletion failures are
/// logged and swallowed; they must never escalate past the worker.
async fn remove_partial(storage: &dyn AttachmentStorage, issue_id: Uuid, file_name: &str) {
    if let Err(e) = storage.delete(issue_id, file_name).await {
        tracing::warn!(
            error = %e,
            issue_id = %issue_id,
            file_name = %file_name,
            "Failed to clean up partial attachment file"
        );
    }
}
