//! Storefront service-loading registry
//!
//! The single authority for "has service X been created, and if so, what
//! is it". Services are named, constructed lazily by asynchronous loader
//! functions supplied at configuration time, cached for the process
//! lifetime, and observed by UI-facing adapters.
//!
//! ## Architecture
//!
//! ```text
//! ServiceCatalog (immutable name → loader table)
//!        │
//!        ▼
//! ServiceRegistry::get_or_load(name)
//!        │
//!        ├── resolved slot ──► cached instance (no suspension)
//!        ├── pending slot  ──► attach to the in-flight load
//!        └── absent/failed ──► invoke loader once, share the outcome
//!
//! ServiceWatch / ServiceObserver ──► { service, loading, error } over time
//! ReadinessWatch                  ──► "is it ready yet?" without loading
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let catalog = ServiceCatalog::builder()
//!     .register_fn("pricing", "Pricing rules service", || async {
//!         Ok(Arc::new(PricingService::connect().await?))
//!     })?
//!     .build();
//!
//! let registry = ServiceRegistry::new(catalog);
//! let pricing = registry.get_or_load("pricing").await?;
//! ```

pub mod catalog;
pub mod config;
pub mod loader;
pub mod observer;
pub mod readiness;
pub mod registry;

pub use catalog::{ServiceCatalog, ServiceCatalogBuilder, ServiceEntry};
pub use config::RegistryConfig;
pub use loader::{loader_fn, FnLoader, ServiceLoader};
pub use observer::{ServiceObserver, ServiceState, ServiceWatch};
pub use readiness::ReadinessWatch;
pub use registry::ServiceRegistry;
