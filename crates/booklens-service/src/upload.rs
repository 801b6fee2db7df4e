//! Upload submission boundary and job lifecycle operations.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use booklens_core::traits::BlobStore;
use booklens_core::types::UploadId;
use booklens_core::{AppError, AppResult};
use booklens_entity::upload::UploadJob;
use booklens_pipeline::ingest::ParsedBatch;
use booklens_pipeline::queue::UploadQueue;
use booklens_store::store::CascadeReport;
use booklens_store::DocumentStore;

/// The submission boundary.
///
/// Validation and identity rewriting happen before any state changes; the
/// file is staged before the job enters the queue, so a staging failure
/// leaves no job record behind.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    queue: UploadQueue,
}

impl UploadService {
    pub fn new(store: Arc<DocumentStore>, blobs: Arc<dyn BlobStore>, queue: UploadQueue) -> Self {
        Self {
            store,
            blobs,
            queue,
        }
    }

    /// Validate, stage, and enqueue one uploaded CSV.
    ///
    /// Book identities colliding with an already-registered book of a
    /// different title are rewritten with a `9` suffix before staging, so
    /// the staged file is what the processor will ingest verbatim.
    pub async fn submit(&self, filename: &str, data: Bytes) -> AppResult<UploadJob> {
        let mut batch = ParsedBatch::parse(&data)?;
        if batch.is_empty() {
            return Err(AppError::validation("file contains no usable rows"));
        }

        let renames = batch.rewrite_conflicts(|id| self.store.books.title_of(id));
        for (from, to) in &renames {
            info!(%from, %to, filename, "rewrote colliding book identity");
        }
        let staged = if renames.is_empty() {
            data
        } else {
            batch.to_csv_bytes()?
        };

        let job = UploadJob::new(
            filename,
            staged.len() as u64,
            batch.len() as u64,
            batch.book_ids(),
        );
        self.blobs
            .put(&job.staging_key(), staged)
            .await
            .map_err(|e| AppError::staging(format!("failed to stage upload: {e}")))?;

        self.queue.submit(job).await
    }

    /// Fetch one job.
    pub fn get(&self, id: UploadId) -> AppResult<UploadJob> {
        self.store
            .uploads
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("upload {id} not found")))
    }

    /// All jobs, newest submission first.
    pub fn list(&self) -> Vec<UploadJob> {
        self.store.uploads.list()
    }

    /// Delete a job and everything derived from it, then advance the queue
    /// in case the deleted job was holding a position.
    pub async fn delete(&self, id: UploadId) -> AppResult<CascadeReport> {
        let staging_key = self.store.uploads.get(id).map(|job| job.staging_key());
        let report = self.store.delete_upload_cascade(id)?;

        if let Some(key) = staging_key {
            if let Err(err) = self.blobs.delete(&key).await {
                warn!(upload_id = %id, error = %err, "failed to remove staged blob");
            }
        }

        self.queue.admit_next().await?;
        Ok(report)
    }

    /// Fail jobs stranded in the processing slot by an interrupted run.
    pub async fn recover_stranded(&self) -> AppResult<usize> {
        self.queue.recover_stranded().await
    }

    /// Wait until every submitted job has reached a terminal state.
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }
}
