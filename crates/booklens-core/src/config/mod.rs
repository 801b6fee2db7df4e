//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so a partial (or absent)
//! file still yields a usable configuration.

pub mod cache;
pub mod enrichment;
pub mod logging;
pub mod pipeline;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::cache::CacheConfig;
pub use self::enrichment::EnrichmentConfig;
pub use self::logging::LoggingConfig;
pub use self::pipeline::PipelineConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the TOML
/// configuration file plus `BOOKLENS__*` environment overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Word-cloud cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Batch processing settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Enrichment service settings.
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variables
    /// (`BOOKLENS__SECTION__KEY`) layered on top. A missing file is not an
    /// error; defaults apply.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("BOOKLENS").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = AppConfig::default();
        assert!(config.pipeline.chunk_size > 0);
        assert!(config.cache.global_ttl_seconds > 0);
        assert_eq!(config.logging.level, "info");
    }
}
