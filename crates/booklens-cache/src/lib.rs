//! # booklens-cache
//!
//! The cache-or-compute aggregation layer backing the word-cloud views:
//! [`AggregateCache`] implements stale-while-recompute reads over the
//! document store's cache collection, and [`builders`] holds the three
//! aggregation variants (global, per-book, per-upload).

pub mod aggregate;
pub mod builders;

pub use aggregate::AggregateCache;
