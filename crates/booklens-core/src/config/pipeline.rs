//! Batch processing configuration.

use serde::{Deserialize, Serialize};

/// Settings for the per-job batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of records per enrichment chunk for large inputs.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Inputs at or below this row count are processed as a single chunk.
    #[serde(default = "default_single_pass_threshold")]
    pub single_pass_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            single_pass_threshold: default_single_pass_threshold(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_single_pass_threshold() -> usize {
    2000
}
