//! Enrichment service configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the out-of-process enrichment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// HTTP endpoint accepting record batches for enrichment.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds. Enrichment is slow; keep this generous.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8900/enrich".to_string()
}

fn default_timeout() -> u64 {
    300
}
