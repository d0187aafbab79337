//! Upload planning: validation, sanitization, and name assignment.
//!
//! This stage is strictly sequential so uniqueness assignment never races;
//! the executor may then write files in any order without affecting names.

use std::collections::HashSet;

use localgov_core::{sanitize_file_name, unique_file_name, NameRegistry};
use uuid::Uuid;

use super::types::{PlanOutcome, PlanSummary, RawUpload, UploadPlan};

/// Turn a raw batch of incoming files into an ordered list of upload plans.
///
/// For each file in submission order: zero-length files are skipped and
/// counted, files whose name sanitizes to nothing are skipped and counted,
/// and everything else gets a collision-free final name against both the
/// destination's existing files (`existing`, the idempotency guard for
/// retried submissions) and earlier files in the same batch. Two batch
/// files with the same sanitized name are both kept, the second under a
/// `" (1)"` suffix; only unusable files are dropped.
pub fn build_upload_plans(
    files: Vec<RawUpload>,
    existing: &HashSet<String>,
    issue_id: Uuid,
) -> PlanOutcome {
    let mut plans = Vec::with_capacity(files.len());
    let mut summary = PlanSummary::default();

    // Tracks both already-existing and newly-planned names.
    let mut used = NameRegistry::seeded(existing);

    for file in files {
        summary.total += 1;

        if file.size_bytes <= 0 {
            summary.skipped_empty += 1;
            continue;
        }

        let sanitized = sanitize_file_name(&file.file_name);
        if sanitized.is_empty() {
            summary.skipped_bad_name += 1;
            continue;
        }

        let final_name = unique_file_name(&used, &sanitized);
        used.insert(&final_name);

        let relative_path = format!("uploads/issues/{}/{}", issue_id, final_name);
        plans.push(UploadPlan {
            file,
            final_name,
            relative_path,
        });
        summary.accepted += 1;
    }

    tracing::debug!(
        issue_id = %issue_id,
        total = summary.total,
        accepted = summary.accepted,
        skipped_empty = summary.skipped_empty,
        skipped_bad_name = summary.skipped_bad_name,
        "Upload plans built"
    );

    PlanOutcome { plans, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(name: &str) -> RawUpload {
        RawUpload::from_bytes(name, "image/jpeg", Bytes::from_static(b"data"))
    }

    fn empty_upload(name: &str) -> RawUpload {
        RawUpload::from_bytes(name, "image/jpeg", Bytes::new())
    }

    #[test]
    fn plan_count_is_total_minus_rejects() {
        let files = vec![
            upload("a.jpg"),
            empty_upload("b.jpg"),
            upload("c.jpg"),
            upload("..."),
            upload("d.jpg"),
        ];

        let outcome = build_upload_plans(files, &HashSet::new(), Uuid::new_v4());

        assert_eq!(outcome.summary.total, 5);
        assert_eq!(outcome.summary.skipped_empty, 1);
        assert_eq!(outcome.summary.skipped_bad_name, 1);
        assert_eq!(outcome.summary.accepted, 3);
        assert_eq!(outcome.plans.len(), 3);
    }

    #[test]
    fn order_is_preserved_and_determines_suffixes() {
        let files = vec![upload("photo.jpg"), upload("site.png"), upload("photo.jpg")];

        let outcome = build_upload_plans(files, &HashSet::new(), Uuid::new_v4());

        let names: Vec<&str> = outcome.plans.iter().map(|p| p.final_name.as_str()).collect();
        assert_eq!(names, vec!["photo.jpg", "site.png", "photo (1).jpg"]);
    }

    #[test]
    fn intra_batch_collisions_are_kept_not_dropped() {
        let files = vec![upload("a?.jpg"), upload("a*.jpg")];

        let outcome = build_upload_plans(files, &HashSet::new(), Uuid::new_v4());

        // Both sanitize to "a_.jpg"; the second is suffixed, neither is lost.
        assert_eq!(outcome.summary.accepted, 2);
        assert_eq!(outcome.plans[0].final_name, "a_.jpg");
        assert_eq!(outcome.plans[1].final_name, "a_ (1).jpg");
    }

    #[test]
    fn existing_destination_names_are_respected() {
        let existing: HashSet<String> =
            ["photo.jpg".to_string(), "photo (1).jpg".to_string()].into();
        let files = vec![upload("photo.jpg")];

        let outcome = build_upload_plans(files, &existing, Uuid::new_v4());

        assert_eq!(outcome.plans[0].final_name, "photo (2).jpg");
    }

    #[test]
    fn relative_path_points_into_issue_directory() {
        let issue_id = Uuid::new_v4();
        let outcome = build_upload_plans(vec![upload("photo.jpg")], &HashSet::new(), issue_id);

        assert_eq!(
            outcome.plans[0].relative_path,
            format!("uploads/issues/{}/photo.jpg", issue_id)
        );
    }

    #[test]
    fn client_paths_are_stripped_before_planning() {
        let files = vec![upload("C:\\fakepath\\photo.jpg")];
        let outcome = build_upload_plans(files, &HashSet::new(), Uuid::new_v4());

        assert_eq!(outcome.plans[0].final_name, "photo.jpg");
    }
}
