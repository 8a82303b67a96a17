//! Service access hook
//!
//! Adapts the registry's asynchronous contract to an observable interface
//! a rendering layer can consume: a [`ServiceState`] snapshot that moves
//! from loading to ready or failed as the underlying load settles.

use storefront_domain::{Error, LoadFailure, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::registry::ServiceRegistry;

/// Observable state of one named service
#[derive(Clone)]
pub struct ServiceState<T> {
    /// The resolved service, once available
    pub service: Option<T>,
    /// Whether a load is still in flight
    pub loading: bool,
    /// The load failure, if the attempt failed
    pub error: Option<LoadFailure>,
}

impl<T> ServiceState<T> {
    pub(crate) fn loading() -> Self {
        Self {
            service: None,
            loading: true,
            error: None,
        }
    }

    pub(crate) fn ready(service: T) -> Self {
        Self {
            service: Some(service),
            loading: false,
            error: None,
        }
    }

    pub(crate) fn failed(error: LoadFailure) -> Self {
        Self {
            service: None,
            loading: false,
            error: Some(error),
        }
    }

    /// Whether the service resolved
    pub fn is_ready(&self) -> bool {
        self.service.is_some()
    }
}

impl<T> std::fmt::Debug for ServiceState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("ready", &self.service.is_some())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

/// Live view onto one named service
///
/// Created by [`ServiceRegistry::observe`]. Holds a watch channel fed by
/// a background observer task; dropping the watch stops observing without
/// cancelling the underlying registry load (other consumers may still be
/// attached to it).
pub struct ServiceWatch<T> {
    service: String,
    rx: watch::Receiver<ServiceState<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> ServiceWatch<T> {
    /// Name of the observed service
    pub fn name(&self) -> &str {
        &self.service
    }
}

impl<T> ServiceWatch<T>
where
    T: Clone,
{
    /// Current state snapshot
    pub fn state(&self) -> ServiceState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change
    ///
    /// Returns `false` once no further changes can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the load settles, returning the terminal state
    pub async fn settled(&mut self) -> ServiceState<T> {
        loop {
            let state = self.rx.borrow_and_update().clone();
            if !state.loading {
                return state;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

impl<T> Drop for ServiceWatch<T> {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

impl<T> std::fmt::Debug for ServiceWatch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWatch")
            .field("service", &self.service)
            .finish()
    }
}

impl<T> ServiceRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Observe a named service, triggering a load if it is not resolved
    ///
    /// Fails fast with [`Error::UnknownService`] when no loader is
    /// registered for the name. A load failure is surfaced through the
    /// state's `error` field, never by panicking into the consumer.
    pub fn observe(&self, name: &str) -> Result<ServiceWatch<T>> {
        if !self.catalog().contains(name) {
            return Err(Error::unknown_service(name));
        }

        // Already resolved: hand out a settled watch with no task behind it.
        if let Some(service) = self.peek(name) {
            let (_tx, rx) = watch::channel(ServiceState::ready(service));
            return Ok(ServiceWatch {
                service: name.to_string(),
                rx,
                task: None,
            });
        }

        let observer = Uuid::new_v4();
        let (tx, rx) = watch::channel(ServiceState::loading());
        let registry = self.clone();
        let service = name.to_string();
        let task = tokio::spawn(async move {
            let state = match registry.get_or_load(&service).await {
                Ok(instance) => ServiceState::ready(instance),
                Err(Error::Load(failure)) => ServiceState::failed(failure),
                Err(other) => {
                    ServiceState::failed(LoadFailure::new(service.clone(), other.to_string()))
                }
            };
            // A send error means the watch was torn down before the load
            // settled; the late result is discarded.
            if tx.send(state).is_err() {
                debug!(
                    service = service,
                    observer = %observer,
                    "Watch torn down before load settled"
                );
            }
        });

        Ok(ServiceWatch {
            service: name.to_string(),
            rx,
            task: Some(task),
        })
    }
}

/// Consumer-side holder that follows the "current service of interest"
///
/// Mirrors the access-hook re-invocation policy: observing a new name
/// discards interest in the previous name's outcome (the previous watch is
/// dropped) without cancelling its in-flight registry load.
pub struct ServiceObserver<T> {
    registry: ServiceRegistry<T>,
    watch: Option<ServiceWatch<T>>,
}

impl<T> ServiceObserver<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an observer bound to a registry
    pub fn new(registry: ServiceRegistry<T>) -> Self {
        Self {
            registry,
            watch: None,
        }
    }

    /// Point the observer at a service name
    ///
    /// Keeps the current watch when the name is unchanged; otherwise the
    /// old watch is dropped and a new one starts.
    pub fn observe(&mut self, name: &str) -> Result<()> {
        let unchanged = matches!(&self.watch, Some(watch) if watch.name() == name);
        if unchanged {
            return Ok(());
        }
        if let Some(old) = self.watch.take() {
            debug!(from = old.name(), to = name, "Observer switching service");
        }
        self.watch = Some(self.registry.observe(name)?);
        Ok(())
    }

    /// The watch for the currently observed service, if any
    pub fn current(&self) -> Option<&ServiceWatch<T>> {
        self.watch.as_ref()
    }

    /// Mutable access to the current watch (for awaiting changes)
    pub fn current_mut(&mut self) -> Option<&mut ServiceWatch<T>> {
        self.watch.as_mut()
    }

    /// State snapshot of the currently observed service
    pub fn state(&self) -> Option<ServiceState<T>> {
        self.watch.as_ref().map(ServiceWatch::state)
    }
}

impl<T> std::fmt::Debug for ServiceObserver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceObserver")
            .field("observing", &self.watch.as_ref().map(|w| w.name().to_string()))
            .finish()
    }
}
