//! Layered configuration: every section has defaults, TOML overrides any subset.

pub mod defaults;
mod embedding_config;
mod observability_config;
mod retrieval_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CodescopeResult, ConfigError};

pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

/// Full codescope configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodescopeConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub observability: ObservabilityConfig,
}

impl CodescopeConfig {
    /// Parse a TOML string. Missing sections and fields fall back to defaults.
    pub fn from_toml(s: &str) -> CodescopeResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a TOML file.
    pub fn from_file(path: &Path) -> CodescopeResult<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: display.clone(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: display,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no deployment can run with.
    pub fn validate(&self) -> CodescopeResult<()> {
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be greater than zero"));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be greater than zero"));
        }
        if self.retrieval.default_limit <= 0 {
            return Err(invalid("retrieval.default_limit", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> crate::errors::CodescopeError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
