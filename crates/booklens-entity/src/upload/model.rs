//! Upload job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use booklens_core::types::UploadId;

use super::status::UploadStatus;

/// One submitted CSV batch and its processing lifecycle.
///
/// Mutated only by the upload queue and the batch processor; admission and
/// completion are serialized by the queue coordinator, so no two actors
/// ever write the same job concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadJob {
    /// Unique identifier, assigned at submission. Immutable.
    pub id: UploadId,
    /// Original filename of the submitted CSV. Immutable.
    pub filename: String,
    /// Size of the staged file in bytes. Immutable.
    pub size_bytes: u64,
    /// Current lifecycle status.
    pub status: UploadStatus,
    /// Queue position: `1` is the processing slot, queued jobs hold `2..`;
    /// `None` once the job is terminal.
    pub queue_position: Option<u32>,
    /// Total record count parsed from the file at submission.
    pub total_records: u64,
    /// Records enriched so far. Advisory progress counter only.
    pub processed_records: u64,
    /// Human-readable failure message; set only on `Failed`.
    pub error_message: Option<String>,
    /// Book identities extracted from the file. Used for cascading delete
    /// and for scoping the per-upload word cloud.
    pub book_ids: Vec<String>,
    /// When the job was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When the job was last mutated.
    pub last_updated_at: DateTime<Utc>,
}

impl UploadJob {
    /// Create a new job in the `Queued` state with no position assigned yet.
    pub fn new(
        filename: impl Into<String>,
        size_bytes: u64,
        total_records: u64,
        book_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UploadId::new(),
            filename: filename.into(),
            size_bytes,
            status: UploadStatus::Queued,
            queue_position: None,
            total_records,
            processed_records: 0,
            error_message: None,
            book_ids,
            submitted_at: now,
            last_updated_at: now,
        }
    }

    /// Blob store key for this job's staged file.
    pub fn staging_key(&self) -> String {
        format!("incoming/{}.csv", self.id)
    }

    /// Human-readable staged file size, e.g. `"1.50 KB"`.
    pub fn size_formatted(&self) -> String {
        booklens_core::types::format_size(self.size_bytes)
    }

    /// Bump the last-updated timestamp.
    pub fn touch(&mut self) {
        self.last_updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_queued_without_position() {
        let job = UploadJob::new("comments.csv", 42, 3, vec!["b1".into()]);
        assert_eq!(job.status, UploadStatus::Queued);
        assert_eq!(job.queue_position, None);
        assert_eq!(job.processed_records, 0);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_staging_key_is_id_scoped() {
        let job = UploadJob::new("a.csv", 1, 0, vec![]);
        assert_eq!(job.staging_key(), format!("incoming/{}.csv", job.id));
    }
}
