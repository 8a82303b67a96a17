//! Registry bootstrap
//!
//! Wires application configuration into a running service registry. The
//! registry is constructed exactly once at application start and handed
//! to consumers by reference; there is no global mutable instance.

use std::path::Path;

use storefront_domain::Result;
use storefront_registry::{ServiceCatalog, ServiceRegistry};
use tracing::info;

use crate::config::{AppConfig, ConfigLoader};

/// Load application configuration
///
/// Uses the default loader; pass an explicit path to skip default-path
/// discovery.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    loader.load()
}

/// Build the service registry from configuration
///
/// The catalog comes from the application's composition root; the
/// registry only consumes it.
pub fn build_registry<T>(catalog: ServiceCatalog<T>, config: &AppConfig) -> ServiceRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    let registry_config = config.services.to_registry_config();
    info!(
        services = catalog.len(),
        poll_interval_ms = registry_config.poll_interval_ms,
        "Building service registry"
    );
    ServiceRegistry::with_config(catalog, registry_config)
}
