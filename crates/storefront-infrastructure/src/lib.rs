//! Storefront infrastructure layer
//!
//! Cross-cutting technical concerns: configuration loading and
//! validation, structured logging bootstrap, error-context utilities, and
//! the wiring that turns application configuration into a running service
//! registry.

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::{build_registry, load_config};
pub use config::{AppConfig, ConfigBuilder, ConfigLoader, LoggingConfig, ServicesConfig};
pub use logging::init_logging;
