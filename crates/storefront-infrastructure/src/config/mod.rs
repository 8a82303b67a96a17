//! Configuration
//!
//! Serde-backed configuration types plus the figment-based loader that
//! merges defaults, a TOML file, and environment overrides.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig, ServicesConfig};
