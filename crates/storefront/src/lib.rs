//! # Storefront
//!
//! Lazy service-loading registry for the store management platform.
//!
//! Application services (product inventory, pricing, store sessions, …)
//! are expensive to construct, so they are registered as named
//! asynchronous loaders and instantiated on first use. The registry
//! guarantees one loader invocation per name no matter how many
//! consumers ask concurrently, caches the instance for the process
//! lifetime, and exposes readiness observation for UI layers.
//!
//! ## Example
//!
//! ```ignore
//! use storefront::{load_config, build_registry, ServiceCatalog};
//!
//! let catalog = ServiceCatalog::builder()
//!     .register_fn("products", "Product inventory service", || async {
//!         Ok(ProductService::connect().await?)
//!     })?
//!     .build();
//!
//! let config = load_config(None)?;
//! let registry = build_registry(catalog, &config);
//!
//! let products = registry.get_or_load("products").await?;
//! ```
//!
//! ## Architecture
//!
//! The workspace follows a layered split:
//!
//! - `domain` - error taxonomy and service lifecycle events
//! - `registry` - loader table, registry, access and readiness hooks
//! - `infrastructure` - configuration, logging, and bootstrap wiring

/// Domain layer - error taxonomy and lifecycle events
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use storefront_domain::*;
}

/// Registry layer - the service-loading core
///
/// Re-exports from the registry crate for convenience
pub mod registry {
    pub use storefront_registry::*;
}

/// Infrastructure layer - config, logging, and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use storefront_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::{Error, LoadFailure, Result, ServiceEvent};
pub use registry::{
    loader_fn, ReadinessWatch, RegistryConfig, ServiceCatalog, ServiceCatalogBuilder,
    ServiceLoader, ServiceObserver, ServiceRegistry, ServiceState, ServiceWatch,
};

// Re-export the bootstrap entry points at the crate root
pub use infrastructure::{build_registry, init_logging, load_config, AppConfig};
