//! # booklens-entity
//!
//! Domain entity models for BookLens: upload jobs and their lifecycle,
//! books, enriched comment records, and word-cloud cache entries.

pub mod book;
pub mod cloud;
pub mod comment;
pub mod upload;

pub use book::Book;
pub use cloud::{CacheEntry, CacheScope, CloudTag};
pub use comment::CommentRecord;
pub use upload::{JobOutcome, UploadJob, UploadStatus};
