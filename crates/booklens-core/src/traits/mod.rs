//! Collaborator traits implemented outside this crate.

pub mod blob;
pub mod enrichment;

pub use blob::BlobStore;
pub use enrichment::{Enrichment, EnrichmentEngine, Sentiment};
