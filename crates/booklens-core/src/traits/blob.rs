//! Blob store trait for staging raw uploaded files.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the file-staging blob store.
///
/// Uploaded CSV batches are staged here between submission and batch
/// processing. Operations are idempotent and best-effort from the
/// caller's point of view: a failed `delete` is logged by the caller,
/// never escalated, and must not block queue advancement.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store a blob under the given key, overwriting any existing blob.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read a blob into memory as a complete byte vector.
    async fn read(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the blob under the given key. Deleting a missing blob is not
    /// an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists under the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
