use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use crate::resilience::CircuitBreakerConfig;

/// File read by [`CatalogConfig::load`] when set.
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";
/// Overrides `inventory.base_url` and switches to the remote source.
pub const INVENTORY_URL_ENV: &str = "CATALOG_INVENTORY_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Where stock levels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventorySource {
    /// In-process inventory store
    #[default]
    Local,
    /// Remote inventory service over HTTP
    Remote,
}

/// Settings for the resilient inventory client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryClientConfig {
    pub source: InventorySource,
    pub base_url: String,
    pub command_key: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub failure_threshold: u32,
    pub cooldown_ms: u64,
}

impl Default for InventoryClientConfig {
    fn default() -> Self {
        Self {
            source: InventorySource::Local,
            base_url: "http://inventory-service".to_string(),
            command_key: "inventory-by-productcode".to_string(),
            request_timeout_ms: 1_000,
            connect_timeout_ms: 500,
            failure_threshold: 5,
            cooldown_ms: 5_000,
        }
    }
}

impl InventoryClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig::default()
            .with_failure_threshold(self.failure_threshold)
            .with_cooldown(Duration::from_millis(self.cooldown_ms))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };
        if self.source == InventorySource::Remote && self.base_url.trim().is_empty() {
            return invalid("inventory.base_url must not be empty");
        }
        if self.command_key.trim().is_empty() {
            return invalid("inventory.command_key must not be empty");
        }
        if self.request_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return invalid("inventory timeouts must be greater than zero");
        }
        if self.failure_threshold == 0 {
            return invalid("inventory.failure_threshold must be at least 1");
        }
        if self.cooldown_ms == 0 {
            return invalid("inventory.cooldown_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Top-level catalog service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub inventory: InventoryClientConfig,
}

impl CatalogConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&raw)
    }

    /// Defaults, then the file named by `CATALOG_CONFIG`, then
    /// `CATALOG_INVENTORY_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(INVENTORY_URL_ENV) {
            info!(base_url = %url, "Using remote inventory service from environment");
            config.inventory.base_url = url;
            config.inventory.source = InventorySource::Remote;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inventory.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.inventory.source, InventorySource::Local);
        assert_eq!(config.inventory.command_key, "inventory-by-productcode");
        assert_eq!(config.inventory.request_timeout(), Duration::from_secs(1));
        assert_eq!(config.inventory.breaker().failure_threshold, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CatalogConfig::from_toml_str(
            r#"
            [inventory]
            source = "remote"
            base_url = "http://localhost:8181"
            failure_threshold = 3
            cooldown_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.source, InventorySource::Remote);
        assert_eq!(config.inventory.base_url, "http://localhost:8181");
        assert_eq!(config.inventory.breaker().cooldown, Duration::from_millis(250));
        assert_eq!(config.inventory.request_timeout_ms, 1_000);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let zero_threshold = CatalogConfig::from_toml_str("[inventory]\nfailure_threshold = 0\n");
        assert!(matches!(zero_threshold, Err(ConfigError::Invalid(_))));

        let zero_timeout = CatalogConfig::from_toml_str("[inventory]\nrequest_timeout_ms = 0\n");
        assert!(matches!(zero_timeout, Err(ConfigError::Invalid(_))));

        let bad_source = CatalogConfig::from_toml_str("[inventory]\nsource = \"carrier-pigeon\"\n");
        assert!(matches!(bad_source, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let missing = CatalogConfig::from_file("/nonexistent/catalog.toml");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
