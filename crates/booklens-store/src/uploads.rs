//! Upload job collection.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use booklens_core::error::AppError;
use booklens_core::result::AppResult;
use booklens_core::types::UploadId;
use booklens_entity::upload::{UploadJob, UploadStatus};

/// A stored job plus its insertion sequence number.
///
/// The sequence breaks submission-time ties so FIFO promotion stays
/// deterministic even when two jobs land within one clock tick.
#[derive(Debug, Clone)]
struct StoredJob {
    seq: u64,
    job: UploadJob,
}

/// Collection of upload jobs keyed by id.
#[derive(Debug, Default)]
pub struct UploadCollection {
    jobs: DashMap<UploadId, StoredJob>,
    next_seq: AtomicU64,
}

impl UploadCollection {
    /// Insert a new job.
    pub fn insert(&self, job: UploadJob) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.jobs.insert(job.id, StoredJob { seq, job });
    }

    /// Fetch a job by id.
    pub fn get(&self, id: UploadId) -> Option<UploadJob> {
        self.jobs.get(&id).map(|s| s.job.clone())
    }

    /// Apply a mutation to a job, returning the updated copy.
    pub fn update<F>(&self, id: UploadId, mutate: F) -> AppResult<UploadJob>
    where
        F: FnOnce(&mut UploadJob),
    {
        let mut stored = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("upload job {id} not found")))?;
        mutate(&mut stored.job);
        Ok(stored.job.clone())
    }

    /// Remove a job, returning it if present.
    pub fn remove(&self, id: UploadId) -> Option<UploadJob> {
        self.jobs.remove(&id).map(|(_, s)| s.job)
    }

    /// All jobs, newest submission first.
    pub fn list(&self) -> Vec<UploadJob> {
        let mut jobs: Vec<StoredJob> = self.jobs.iter().map(|e| e.value().clone()).collect();
        jobs.sort_by(|a, b| b.seq.cmp(&a.seq));
        jobs.into_iter().map(|s| s.job).collect()
    }

    /// Queued jobs in submission order (earliest first).
    pub fn queued(&self) -> Vec<UploadJob> {
        let mut jobs: Vec<StoredJob> = self
            .jobs
            .iter()
            .filter(|e| e.value().job.status == UploadStatus::Queued)
            .map(|e| e.value().clone())
            .collect();
        jobs.sort_by(|a, b| {
            (a.job.submitted_at, a.seq).cmp(&(b.job.submitted_at, b.seq))
        });
        jobs.into_iter().map(|s| s.job).collect()
    }

    /// The job currently occupying the processing slot, if any.
    pub fn processing(&self) -> Option<UploadJob> {
        self.jobs
            .iter()
            .find(|e| e.value().job.status == UploadStatus::Processing)
            .map(|e| e.value().job.clone())
    }

    /// Number of queued jobs.
    pub fn count_queued(&self) -> usize {
        self.jobs
            .iter()
            .filter(|e| e.value().job.status == UploadStatus::Queued)
            .count()
    }

    /// Number of jobs not yet in a terminal state.
    pub fn count_active(&self) -> usize {
        self.jobs
            .iter()
            .filter(|e| !e.value().job.status.is_terminal())
            .count()
    }

    /// Total number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
