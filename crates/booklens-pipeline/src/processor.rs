//! Per-job batch processor: read the staged file, register books, enrich
//! comment texts in chunks, and persist the resulting records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use booklens_core::config::PipelineConfig;
use booklens_core::traits::{BlobStore, EnrichmentEngine};
use booklens_core::{AppError, AppResult};
use booklens_entity::upload::{JobOutcome, UploadJob, UploadStatus};
use booklens_entity::CommentRecord;
use booklens_store::DocumentStore;

use crate::ingest::ParsedBatch;

/// Runs one admitted upload job end to end.
///
/// A chunk whose enrichment call fails is skipped with a warning rather than
/// failing the whole job; only errors before enrichment starts (missing or
/// unparseable staged file) fail the job.
#[derive(Debug)]
pub struct BatchProcessor {
    store: Arc<DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    engine: Arc<dyn EnrichmentEngine>,
    config: PipelineConfig,
}

impl BatchProcessor {
    pub fn new(
        store: Arc<DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        engine: Arc<dyn EnrichmentEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            engine,
            config,
        }
    }

    fn chunk_len(&self, total: usize) -> usize {
        if total <= self.config.single_pass_threshold {
            total.max(1)
        } else {
            self.config.chunk_size.max(1)
        }
    }

    /// Process the staged file for `job`, returning how many records were
    /// enriched and persisted.
    async fn execute(&self, job: &UploadJob) -> AppResult<u64> {
        self.store.uploads.update(job.id, |j| {
            j.status = UploadStatus::Processing;
            j.touch();
        })?;

        let data = self
            .blobs
            .read(&job.staging_key())
            .await
            .map_err(|e| AppError::processing(format!("failed to read staged file: {e}")))?;
        let batch = ParsedBatch::parse(&data)
            .map_err(|e| AppError::processing(format!("failed to parse staged file: {e}")))?;

        for book in batch.books() {
            self.store.books.upsert(book);
        }

        if batch.is_empty() {
            return Ok(0);
        }

        let chunk_len = self.chunk_len(batch.len());
        let mut enriched_total = 0u64;
        for (index, chunk) in batch.rows.chunks(chunk_len).enumerate() {
            let texts: Vec<String> = chunk.iter().map(|row| row.content.clone()).collect();
            match self.engine.enrich_batch(&texts).await {
                Ok(enrichments) if enrichments.len() == chunk.len() => {
                    let records: Vec<CommentRecord> = chunk
                        .iter()
                        .cloned()
                        .zip(enrichments)
                        .map(|(row, enrichment)| {
                            CommentRecord::from_enrichment(
                                row.comment_id,
                                row.book_id,
                                job.id,
                                row.user,
                                row.content,
                                row.rating,
                                enrichment,
                            )
                        })
                        .collect();
                    // Gated append; fails NotFound once the job has been
                    // deleted mid-run.
                    let persisted = self.store.append_comments(job.id, records)? as u64;
                    self.store.uploads.update(job.id, |j| {
                        j.processed_records += persisted;
                        j.touch();
                    })?;
                    enriched_total += persisted;
                }
                Ok(mismatched) => {
                    warn!(
                        job_id = %job.id,
                        chunk = index,
                        expected = chunk.len(),
                        received = mismatched.len(),
                        "enrichment returned wrong record count; skipping chunk"
                    );
                }
                Err(err) => {
                    warn!(
                        job_id = %job.id,
                        chunk = index,
                        error = %err,
                        "enrichment failed; skipping chunk"
                    );
                }
            }
        }

        Ok(enriched_total)
    }
}

#[async_trait]
impl crate::queue::JobRunner for BatchProcessor {
    async fn run(&self, job: UploadJob) -> JobOutcome {
        let outcome = match self.execute(&job).await {
            Ok(enriched) => {
                info!(
                    job_id = %job.id,
                    enriched,
                    total = job.total_records,
                    "upload batch processed"
                );
                JobOutcome::Completed
            }
            Err(err) => {
                error!(job_id = %job.id, error = %err, "upload batch failed");
                JobOutcome::Failed(err.message.clone())
            }
        };

        // The staged blob is consumed either way; removal must never block
        // queue advancement.
        if let Err(err) = self.blobs.delete(&job.staging_key()).await {
            warn!(job_id = %job.id, error = %err, "failed to remove staged blob");
        }

        outcome
    }
}
