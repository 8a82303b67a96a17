//! Service loader port
//!
//! Defines the contract a service factory has to meet before it can be
//! registered in a [`ServiceCatalog`](crate::catalog::ServiceCatalog): a
//! zero-argument asynchronous constructor. Loaders are registered once per
//! service name and never reassigned.

use async_trait::async_trait;
use std::future::Future;
use storefront_domain::Result;

/// Asynchronous factory for a named service
///
/// Implementations are opaque to the registry; any network or I/O they
/// perform is their own concern. A loader is invoked at most once per
/// in-flight load attempt, and again only after a previous attempt failed.
#[async_trait]
pub trait ServiceLoader<T>: Send + Sync {
    /// Produce a fully-constructed service instance
    async fn load(&self) -> Result<T>;
}

/// Adapter turning an async closure into a [`ServiceLoader`]
///
/// Created with [`loader_fn`]; most call sites register closures rather
/// than hand-written loader types.
pub struct FnLoader<F> {
    f: F,
}

#[async_trait]
impl<T, F, Fut> ServiceLoader<T> for FnLoader<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    async fn load(&self) -> Result<T> {
        (self.f)().await
    }
}

/// Wrap an async closure as a [`ServiceLoader`]
///
/// # Example
///
/// ```ignore
/// let loader = loader_fn(|| async { Ok(Arc::new(PricingService::default())) });
/// ```
pub fn loader_fn<T, F, Fut>(f: F) -> FnLoader<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    FnLoader { f }
}
