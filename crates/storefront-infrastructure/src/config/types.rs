//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_registry::config::{DEFAULT_EVENT_CAPACITY, DEFAULT_POLL_INTERVAL_MS};
use storefront_registry::RegistryConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Service registry configuration
    pub services: ServicesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, or error
    pub level: String,
    /// Emit JSON-formatted log lines
    pub json_format: bool,
    /// Optional log file path (daily rotation)
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Service registry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServicesConfig {
    /// Interval between readiness re-checks, in milliseconds
    pub poll_interval_ms: u64,
    /// Capacity of the service lifecycle event channel
    pub event_capacity: usize,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServicesConfig {
    /// Convert into the registry's own configuration type
    pub fn to_registry_config(&self) -> RegistryConfig {
        RegistryConfig::new()
            .with_poll_interval_ms(self.poll_interval_ms)
            .with_event_capacity(self.event_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.services.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.services.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_services_config_converts_to_registry_config() {
        let services = ServicesConfig {
            poll_interval_ms: 250,
            event_capacity: 16,
        };
        let registry = services.to_registry_config();
        assert_eq!(registry.poll_interval_ms, 250);
        assert_eq!(registry.event_capacity, 16);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.services.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }
}
