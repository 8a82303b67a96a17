//! Service catalog - the loader table
//!
//! An immutable mapping from service name to the loader that constructs
//! the service. The catalog is supplied by application configuration and
//! never changes at runtime; the registry resolves every request against
//! it.

use std::collections::HashMap;
use std::sync::Arc;

use storefront_domain::{Error, Result};

use crate::loader::{loader_fn, ServiceLoader};

/// Catalog entry for one named service
///
/// Carries the unique service name, a human-readable description used by
/// diagnostics, and the loader that constructs the instance.
pub struct ServiceEntry<T> {
    name: String,
    description: String,
    loader: Arc<dyn ServiceLoader<T>>,
}

impl<T> ServiceEntry<T> {
    /// Unique service name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The loader that constructs this service
    pub fn loader(&self) -> Arc<dyn ServiceLoader<T>> {
        Arc::clone(&self.loader)
    }
}

impl<T> Clone for ServiceEntry<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<T> std::fmt::Debug for ServiceEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Immutable service catalog
///
/// Built once with [`ServiceCatalogBuilder`]; lookups never mutate it.
pub struct ServiceCatalog<T> {
    entries: HashMap<String, ServiceEntry<T>>,
}

impl<T> ServiceCatalog<T> {
    /// Start building a catalog
    pub fn builder() -> ServiceCatalogBuilder<T> {
        ServiceCatalogBuilder::new()
    }

    /// Get the entry for a service name
    pub fn get(&self, name: &str) -> Option<&ServiceEntry<T>> {
        self.entries.get(name)
    }

    /// Whether a loader is registered for this name
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// List all registered services as (name, description) pairs
    ///
    /// Sorted by name for stable diagnostic output.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut services: Vec<(&str, &str)> = self
            .entries
            .values()
            .map(|e| (e.name(), e.description()))
            .collect();
        services.sort_by_key(|(name, _)| *name);
        services
    }

    /// List all registered service names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Clone for ServiceCatalog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ServiceCatalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCatalog")
            .field("services", &self.names())
            .finish()
    }
}

/// Builder for [`ServiceCatalog`]
///
/// Registration rejects duplicate names: the catalog is a closed set and
/// each name maps to exactly one loader.
pub struct ServiceCatalogBuilder<T> {
    entries: HashMap<String, ServiceEntry<T>>,
}

impl<T> ServiceCatalogBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a loader for a service name
    pub fn register<N, D>(
        mut self,
        name: N,
        description: D,
        loader: impl ServiceLoader<T> + 'static,
    ) -> Result<Self>
    where
        N: Into<String>,
        D: Into<String>,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::configuration(format!(
                "Service '{}' already registered",
                name
            )));
        }
        let entry = ServiceEntry {
            name: name.clone(),
            description: description.into(),
            loader: Arc::new(loader),
        };
        self.entries.insert(name, entry);
        Ok(self)
    }

    /// Register an async closure as the loader for a service name
    pub fn register_fn<N, D, F, Fut>(self, name: N, description: D, f: F) -> Result<Self>
    where
        N: Into<String>,
        D: Into<String>,
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<T>> + Send + 'static,
    {
        self.register(name, description, loader_fn(f))
    }

    /// Finish building the catalog
    pub fn build(self) -> ServiceCatalog<T> {
        ServiceCatalog {
            entries: self.entries,
        }
    }
}

impl<T> Default for ServiceCatalogBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
