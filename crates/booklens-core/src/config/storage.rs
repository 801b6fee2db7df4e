//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Blob store configuration for staged upload files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the local blob store.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_root() -> String {
    "data/blobs".to_string()
}
