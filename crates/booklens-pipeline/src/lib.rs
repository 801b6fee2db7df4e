//! # booklens-pipeline
//!
//! The ingestion core: CSV parsing and identity-collision rewriting
//! ([`ingest`]), the single-slot upload queue coordinator ([`queue`]), the
//! per-job batch processor ([`processor`]), and the out-of-process
//! enrichment client ([`enrichment`]).

pub mod enrichment;
pub mod ingest;
pub mod processor;
pub mod queue;

pub use enrichment::HttpEnrichmentClient;
pub use ingest::ParsedBatch;
pub use processor::BatchProcessor;
pub use queue::{JobRunner, UploadQueue};
