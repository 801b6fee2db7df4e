//! Word-cloud cache configuration.

use serde::{Deserialize, Serialize};

/// TTLs for the cached aggregate views, per scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for the global word cloud, in seconds.
    #[serde(default = "default_global_ttl")]
    pub global_ttl_seconds: u64,
    /// TTL for per-book tag clouds, in seconds.
    #[serde(default = "default_book_ttl")]
    pub book_ttl_seconds: u64,
    /// TTL for per-upload word clouds, in seconds.
    #[serde(default = "default_upload_ttl")]
    pub upload_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            global_ttl_seconds: default_global_ttl(),
            book_ttl_seconds: default_book_ttl(),
            upload_ttl_seconds: default_upload_ttl(),
        }
    }
}

fn default_global_ttl() -> u64 {
    24 * 60 * 60
}

fn default_book_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_upload_ttl() -> u64 {
    24 * 60 * 60
}
