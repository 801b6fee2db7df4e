//! Single-slot upload queue.
//!
//! One job occupies the processing slot at a time; everything else waits in
//! FIFO order with a live queue position. All transitions run under one
//! coordinator lock, so admission and renumbering are atomic with respect to
//! each other.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

use booklens_core::types::UploadId;
use booklens_core::{AppError, AppResult};
use booklens_entity::upload::{JobOutcome, UploadJob, UploadStatus};
use booklens_store::DocumentStore;

/// Executes one admitted job to completion. The queue spawns `run` on its
/// own task and records the outcome when it returns.
#[async_trait]
pub trait JobRunner: Send + Sync + std::fmt::Debug + 'static {
    async fn run(&self, job: UploadJob) -> JobOutcome;
}

/// Handle to the shared queue state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UploadQueue {
    inner: Arc<QueueInner>,
}

#[derive(Debug)]
struct QueueInner {
    store: Arc<DocumentStore>,
    runner: Arc<dyn JobRunner>,
    coordinator: Mutex<()>,
    load: watch::Sender<usize>,
}

impl UploadQueue {
    pub fn new(store: Arc<DocumentStore>, runner: Arc<dyn JobRunner>) -> Self {
        let (load, _) = watch::channel(0);
        Self {
            inner: Arc::new(QueueInner {
                store,
                runner,
                coordinator: Mutex::new(()),
                load,
            }),
        }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.inner.store
    }

    /// Append a job to the queue tail and admit immediately when the
    /// processing slot is free. Returns the job as stored, position assigned.
    pub async fn submit(&self, mut job: UploadJob) -> AppResult<UploadJob> {
        let _guard = self.inner.coordinator.lock().await;
        job.status = UploadStatus::Queued;
        job.queue_position = None;
        let id = job.id;
        info!(job_id = %id, filename = %job.filename, "upload job submitted");
        self.inner.store.uploads.insert(job);
        self.admit_locked()?;
        self.inner
            .store
            .uploads
            .get(id)
            .ok_or_else(|| AppError::internal(format!("job {id} vanished during submission")))
    }

    /// Promote the queue head when the slot is free and renumber the rest.
    pub async fn admit_next(&self) -> AppResult<()> {
        let _guard = self.inner.coordinator.lock().await;
        self.admit_locked()
    }

    /// Record a runner outcome and advance the queue.
    ///
    /// Terminal jobs are left untouched and a late or duplicate report for a
    /// job deleted mid-run is tolerated; either way the next queued job is
    /// admitted.
    pub async fn on_job_finished(&self, id: UploadId, outcome: JobOutcome) -> AppResult<()> {
        let _guard = self.inner.coordinator.lock().await;

        match self.inner.store.uploads.get(id) {
            Some(job) if job.status.is_terminal() => {
                warn!(job_id = %id, status = %job.status, "outcome reported for terminal job; ignoring");
            }
            Some(_) => {
                let (status, message) = match outcome {
                    JobOutcome::Completed => (UploadStatus::Completed, None),
                    JobOutcome::Failed(reason) => (UploadStatus::Failed, Some(reason)),
                };
                let log_message = message.clone();
                self.inner.store.uploads.update(id, |job| {
                    job.status = status;
                    job.queue_position = None;
                    job.error_message = message;
                    job.touch();
                })?;
                match log_message {
                    Some(reason) => error!(job_id = %id, error = %reason, "upload job failed"),
                    None => info!(job_id = %id, "upload job completed"),
                }
            }
            None => {
                warn!(job_id = %id, "outcome reported for unknown job; it was likely deleted mid-run");
            }
        }

        self.admit_locked()
    }

    /// Fail any job left in the processing slot by an interrupted run, then
    /// admit the next queued job. Returns how many jobs were failed.
    pub async fn recover_stranded(&self) -> AppResult<usize> {
        let _guard = self.inner.coordinator.lock().await;

        let mut recovered = 0;
        while let Some(job) = self.inner.store.uploads.processing() {
            self.inner.store.uploads.update(job.id, |j| {
                j.status = UploadStatus::Failed;
                j.queue_position = None;
                j.error_message = Some("processing interrupted by restart".to_string());
                j.touch();
            })?;
            warn!(job_id = %job.id, filename = %job.filename, "recovered stranded processing job");
            recovered += 1;
        }

        self.admit_locked()?;
        Ok(recovered)
    }

    /// Wait until no job is queued or processing.
    pub async fn wait_idle(&self) {
        let mut load = self.inner.load.subscribe();
        loop {
            if self.inner.store.uploads.count_active() == 0 {
                return;
            }
            if load.changed().await.is_err() {
                return;
            }
        }
    }

    /// Core admission step. Requires the coordinator lock.
    ///
    /// When the slot is free the earliest queued job becomes Processing at
    /// position 1 and its runner is dispatched; remaining queued jobs are
    /// renumbered 2..n+1 in submission order.
    fn admit_locked(&self) -> AppResult<()> {
        let store = &self.inner.store;

        if store.uploads.processing().is_none() {
            if let Some(head) = store.uploads.queued().into_iter().next() {
                let promoted = store.uploads.update(head.id, |job| {
                    job.status = UploadStatus::Processing;
                    job.queue_position = Some(1);
                    job.touch();
                })?;
                info!(job_id = %promoted.id, filename = %promoted.filename, "job admitted to processing slot");
                self.dispatch(promoted);
            }
        }

        for (offset, job) in store.uploads.queued().into_iter().enumerate() {
            let position = offset as u32 + 2;
            if job.queue_position != Some(position) {
                store.uploads.update(job.id, |j| {
                    j.queue_position = Some(position);
                    j.touch();
                })?;
            }
        }

        self.inner.load.send_replace(store.uploads.count_active());
        Ok(())
    }

    fn dispatch(&self, job: UploadJob) {
        let queue = self.clone();
        let runner = Arc::clone(&self.inner.runner);
        tokio::spawn(async move {
            let id = job.id;
            let outcome = runner.run(job).await;
            if let Err(err) = queue.on_job_finished(id, outcome).await {
                error!(job_id = %id, error = %err, "failed to record job outcome");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Records which jobs it was asked to run, then parks forever so tests
    /// can drive completion explicitly through `on_job_finished`.
    #[derive(Debug, Default)]
    struct StallingRunner {
        started: std::sync::Mutex<Vec<UploadId>>,
    }

    #[async_trait]
    impl JobRunner for StallingRunner {
        async fn run(&self, job: UploadJob) -> JobOutcome {
            self.started.lock().unwrap().push(job.id);
            std::future::pending().await
        }
    }

    fn queue_with_runner() -> (UploadQueue, Arc<StallingRunner>) {
        let runner = Arc::new(StallingRunner::default());
        let queue = UploadQueue::new(Arc::new(DocumentStore::new()), runner.clone());
        (queue, runner)
    }

    fn job(name: &str) -> UploadJob {
        UploadJob::new(name, 128, 4, vec!["b1".to_string()])
    }

    async fn wait_for_starts(runner: &StallingRunner, expected: usize) {
        for _ in 0..100 {
            if runner.started.lock().unwrap().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("runner never saw {expected} starts");
    }

    #[tokio::test]
    async fn test_first_submission_takes_the_slot() {
        let (queue, runner) = queue_with_runner();
        let stored = queue.submit(job("a.csv")).await.expect("submit");

        assert_eq!(stored.status, UploadStatus::Processing);
        assert_eq!(stored.queue_position, Some(1));
        wait_for_starts(&runner, 1).await;
    }

    #[tokio::test]
    async fn test_queue_advances_in_submission_order() {
        let (queue, runner) = queue_with_runner();
        let j1 = queue.submit(job("a.csv")).await.expect("submit a");
        let j2 = queue.submit(job("b.csv")).await.expect("submit b");
        let j3 = queue.submit(job("c.csv")).await.expect("submit c");

        assert_eq!(j1.queue_position, Some(1));
        assert_eq!(j2.queue_position, Some(2));
        assert_eq!(j3.queue_position, Some(3));

        queue
            .on_job_finished(j1.id, JobOutcome::Completed)
            .await
            .expect("finish j1");

        let store = queue.store();
        let done = store.uploads.get(j1.id).expect("j1");
        assert_eq!(done.status, UploadStatus::Completed);
        assert_eq!(done.queue_position, None);

        let next = store.uploads.get(j2.id).expect("j2");
        assert_eq!(next.status, UploadStatus::Processing);
        assert_eq!(next.queue_position, Some(1));

        let waiting = store.uploads.get(j3.id).expect("j3");
        assert_eq!(waiting.status, UploadStatus::Queued);
        assert_eq!(waiting.queue_position, Some(2));

        wait_for_starts(&runner, 2).await;
        let started = runner.started.lock().unwrap().clone();
        assert_eq!(started, vec![j1.id, j2.id]);
    }

    #[tokio::test]
    async fn test_only_one_job_processes_at_a_time() {
        let (queue, _runner) = queue_with_runner();
        for name in ["a.csv", "b.csv", "c.csv"] {
            queue.submit(job(name)).await.expect("submit");
        }

        let processing = queue
            .store()
            .uploads
            .list()
            .into_iter()
            .filter(|j| j.status == UploadStatus::Processing)
            .count();
        assert_eq!(processing, 1);
        assert_eq!(queue.store().uploads.count_queued(), 2);
    }

    #[tokio::test]
    async fn test_failure_records_reason_and_advances() {
        let (queue, _runner) = queue_with_runner();
        let j1 = queue.submit(job("a.csv")).await.expect("submit a");
        let j2 = queue.submit(job("b.csv")).await.expect("submit b");

        queue
            .on_job_finished(j1.id, JobOutcome::Failed("bad row".to_string()))
            .await
            .expect("finish j1");

        let failed = queue.store().uploads.get(j1.id).expect("j1");
        assert_eq!(failed.status, UploadStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("bad row"));
        assert_eq!(failed.queue_position, None);

        let next = queue.store().uploads.get(j2.id).expect("j2");
        assert_eq!(next.status, UploadStatus::Processing);
    }

    #[tokio::test]
    async fn test_terminal_jobs_are_immutable() {
        let (queue, _runner) = queue_with_runner();
        let j1 = queue.submit(job("a.csv")).await.expect("submit");

        queue
            .on_job_finished(j1.id, JobOutcome::Completed)
            .await
            .expect("first outcome");
        queue
            .on_job_finished(j1.id, JobOutcome::Failed("late report".to_string()))
            .await
            .expect("late outcome is tolerated");

        let stored = queue.store().uploads.get(j1.id).expect("j1");
        assert_eq!(stored.status, UploadStatus::Completed);
        assert_eq!(stored.error_message, None);
    }

    #[tokio::test]
    async fn test_outcome_for_deleted_job_still_advances_queue() {
        let (queue, _runner) = queue_with_runner();
        let j1 = queue.submit(job("a.csv")).await.expect("submit a");
        let j2 = queue.submit(job("b.csv")).await.expect("submit b");

        queue
            .store()
            .delete_upload_cascade(j1.id)
            .expect("cascade delete");
        queue
            .on_job_finished(j1.id, JobOutcome::Completed)
            .await
            .expect("orphan outcome");

        let next = queue.store().uploads.get(j2.id).expect("j2");
        assert_eq!(next.status, UploadStatus::Processing);
        assert_eq!(next.queue_position, Some(1));
    }

    #[tokio::test]
    async fn test_recover_stranded_fails_interrupted_jobs() {
        let store = Arc::new(DocumentStore::new());
        let mut stranded = job("interrupted.csv");
        stranded.status = UploadStatus::Processing;
        stranded.queue_position = Some(1);
        store.uploads.insert(stranded.clone());
        let waiting = job("waiting.csv");
        store.uploads.insert(waiting.clone());

        let queue = UploadQueue::new(store, Arc::new(StallingRunner::default()));
        let recovered = queue.recover_stranded().await.expect("recover");
        assert_eq!(recovered, 1);

        let failed = queue.store().uploads.get(stranded.id).expect("stranded");
        assert_eq!(failed.status, UploadStatus::Failed);
        assert_eq!(
            failed.error_message.as_deref(),
            Some("processing interrupted by restart")
        );

        let promoted = queue.store().uploads.get(waiting.id).expect("waiting");
        assert_eq!(promoted.status, UploadStatus::Processing);
    }

    #[tokio::test]
    async fn test_wait_idle_returns_after_last_outcome() {
        let (queue, _runner) = queue_with_runner();
        let j1 = queue.submit(job("a.csv")).await.expect("submit");

        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.wait_idle().await })
        };
        queue
            .on_job_finished(j1.id, JobOutcome::Completed)
            .await
            .expect("finish");

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_idle should resolve")
            .expect("waiter task");
    }
}
