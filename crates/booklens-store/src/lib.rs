//! # booklens-store
//!
//! The shared document store: in-memory collections for upload jobs, books,
//! enriched comments, and word-cloud cache entries, plus the
//! multi-collection cascade delete.
//!
//! Conflicting writes are serialized inside each collection; the cascade
//! delete additionally takes a store-wide write gate so its removals are
//! observed all-or-nothing.

pub mod books;
pub mod cloud_cache;
pub mod comments;
pub mod store;
pub mod uploads;

pub use books::BookCollection;
pub use cloud_cache::CloudCacheCollection;
pub use comments::{CommentCollection, SentimentStats};
pub use store::{CascadeReport, DocumentStore};
pub use uploads::UploadCollection;
