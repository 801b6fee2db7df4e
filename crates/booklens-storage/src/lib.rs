//! # booklens-storage
//!
//! Blob store implementations. The [`BlobStore`] trait lives in
//! `booklens-core`; this crate provides the local-filesystem backend that
//! stands in for the distributed staging filesystem.
//!
//! [`BlobStore`]: booklens_core::traits::BlobStore

pub mod local;

pub use local::LocalBlobStore;
