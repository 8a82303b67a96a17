//! Service registry
//!
//! Process-wide cache mapping service name to resolved instance, with
//! in-flight load tracking so that at most one loader invocation is ever
//! outstanding per name. The registry is an explicitly constructed value
//! (a cheap clonable handle over shared inner state), created once at
//! application start and passed to whatever needs it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use storefront_domain::{Error, LoadFailure, Result, ServiceEvent};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::catalog::ServiceCatalog;
use crate::config::RegistryConfig;

/// Shared in-flight load operation
///
/// Stored in the slot map so late callers attach to the same outcome
/// instead of re-invoking the loader. The error side is the clonable
/// [`LoadFailure`] because one failure fans out to every attached caller.
type LoadFuture<T> = Shared<BoxFuture<'static, std::result::Result<T, LoadFailure>>>;

/// Per-service registry state
enum Slot<T> {
    /// A load is in flight; late callers await the stored operation
    Pending {
        generation: u64,
        load: LoadFuture<T>,
    },
    /// The service resolved; the instance is stable for the process lifetime
    Resolved(T),
    /// The last load attempt failed; the next request retries from scratch
    Failed(LoadFailure),
}

/// Outcome of attaching to a service slot
enum Attach<T> {
    /// Already resolved; no suspension needed
    Ready(T),
    /// Await the (possibly just-started) in-flight load
    Wait {
        load: LoadFuture<T>,
        generation: u64,
    },
}

struct RegistryInner<T> {
    catalog: ServiceCatalog<T>,
    config: RegistryConfig,
    slots: RwLock<HashMap<String, Slot<T>>>,
    generation: AtomicU64,
    events: broadcast::Sender<ServiceEvent>,
}

/// Single authority for "has service X been created, and if so, what is it"
///
/// Cloning yields another handle to the same registry state.
pub struct ServiceRegistry<T> {
    inner: Arc<RegistryInner<T>>,
}

impl<T> Clone for ServiceRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ServiceRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("catalog", &self.inner.catalog.names())
            .field("subscribers", &self.inner.events.receiver_count())
            .finish()
    }
}

impl<T> ServiceRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a registry over a catalog with default configuration
    pub fn new(catalog: ServiceCatalog<T>) -> Self {
        Self::with_config(catalog, RegistryConfig::default())
    }

    /// Create a registry over a catalog with explicit configuration
    pub fn with_config(catalog: ServiceCatalog<T>, config: RegistryConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(RegistryInner {
                catalog,
                config,
                slots: RwLock::new(HashMap::new()),
                generation: AtomicU64::new(0),
                events,
            }),
        }
    }

    /// The loader table this registry resolves against
    pub fn catalog(&self) -> &ServiceCatalog<T> {
        &self.inner.catalog
    }

    /// The registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Get the cached instance for a service, loading it on first request
    ///
    /// Resolved services return immediately. A request that arrives while
    /// a load is in flight attaches to the outstanding operation; the
    /// loader is never invoked twice concurrently for one name. After a
    /// failure the next request retries from scratch. Requests for names
    /// without a registered loader fail with [`Error::UnknownService`]
    /// and never invoke any loader.
    pub async fn get_or_load(&self, name: &str) -> Result<T> {
        match self.attach(name)? {
            Attach::Ready(service) => Ok(service),
            Attach::Wait { load, generation } => {
                let outcome = load.await;
                // Settle before returning so a sequential retry observes
                // the failed state rather than the stale pending slot.
                self.settle(name, generation, outcome.clone());
                outcome.map_err(Error::from)
            }
        }
    }

    /// Whether the service is currently resolved
    ///
    /// Never suspends and never triggers a load. Absent, pending and
    /// failed entries all report `false`.
    pub fn has(&self, name: &str) -> bool {
        match self.read_slots() {
            Ok(slots) => matches!(slots.get(name), Some(Slot::Resolved(_))),
            Err(_) => false,
        }
    }

    /// The cached instance, only if currently resolved
    ///
    /// Never suspends and never triggers a load.
    pub fn peek(&self, name: &str) -> Option<T> {
        let slots = self.read_slots().ok()?;
        match slots.get(name) {
            Some(Slot::Resolved(service)) => Some(service.clone()),
            _ => None,
        }
    }

    /// The failure kept from the last load attempt, if the entry is failed
    pub fn last_error(&self, name: &str) -> Option<LoadFailure> {
        let slots = self.read_slots().ok()?;
        match slots.get(name) {
            Some(Slot::Failed(failure)) => Some(failure.clone()),
            _ => None,
        }
    }

    /// Names of all currently resolved services, sorted
    pub fn loaded(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.read_slots() {
            Ok(slots) => slots
                .iter()
                .filter(|(_, slot)| matches!(slot, Slot::Resolved(_)))
                .map(|(name, _)| name.clone())
                .collect(),
            Err(_) => return Vec::new(),
        };
        names.sort_unstable();
        names
    }

    /// Clear every slot
    ///
    /// Intended for tests and controlled lifecycle teardown. Loads that
    /// are still in flight run to completion but their outcomes are
    /// discarded: the slot generation has moved on.
    pub fn reset(&self) {
        if let Ok(mut slots) = self.write_slots() {
            slots.clear();
            debug!("Service registry reset");
        }
    }

    /// Subscribe to service lifecycle events
    ///
    /// Events are broadcast to all active subscribers without persistence;
    /// a subscriber that lags past the channel capacity loses the oldest
    /// events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ServiceEvent> {
        self.inner.events.subscribe()
    }

    /// Current number of event subscribers
    pub fn event_subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    /// Attach to the slot for `name`, starting a load if necessary
    fn attach(&self, name: &str) -> Result<Attach<T>> {
        let mut slots = self.write_slots()?;
        match slots.get(name) {
            Some(Slot::Resolved(service)) => {
                debug!(service = name, "Service cache hit");
                return Ok(Attach::Ready(service.clone()));
            }
            Some(Slot::Pending { load, generation }) => {
                debug!(service = name, "Attaching to in-flight service load");
                return Ok(Attach::Wait {
                    load: load.clone(),
                    generation: *generation,
                });
            }
            Some(Slot::Failed(failure)) => {
                debug!(
                    service = name,
                    error = %failure,
                    "Retrying service load after failure"
                );
            }
            None => {}
        }
        self.start_load(&mut slots, name)
    }

    /// Insert a pending slot and kick off the loader
    fn start_load(
        &self,
        slots: &mut HashMap<String, Slot<T>>,
        name: &str,
    ) -> Result<Attach<T>> {
        let entry = self
            .inner
            .catalog
            .get(name)
            .ok_or_else(|| Error::unknown_service(name))?;
        let loader = entry.loader();
        let service = name.to_string();

        let load: LoadFuture<T> = {
            let service = service.clone();
            async move {
                loader.load().await.map_err(move |err| match err {
                    Error::Load(failure) => failure,
                    Error::String(message) => LoadFailure::new(service, message),
                    other => LoadFailure::new(service, other.to_string()),
                })
            }
            .boxed()
            .shared()
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        slots.insert(
            service.clone(),
            Slot::Pending {
                generation,
                load: load.clone(),
            },
        );
        info!(service = name, "Service load started");
        self.emit(ServiceEvent::LoadStarted {
            service: service.clone(),
        });

        // Driver task: the loader runs to completion and the slot settles
        // even if every interested caller has gone away in the meantime.
        let registry = self.clone();
        let driver = load.clone();
        tokio::spawn(async move {
            let outcome = driver.await;
            registry.settle(&service, generation, outcome);
        });

        Ok(Attach::Wait { load, generation })
    }

    /// Record the outcome of a load attempt
    ///
    /// Idempotent: the first caller (or the driver task) to arrive makes
    /// the transition, later arrivals find the slot already settled. The
    /// generation check keeps an outcome from a pre-`reset` attempt from
    /// clobbering a newer slot.
    fn settle(&self, name: &str, generation: u64, outcome: std::result::Result<T, LoadFailure>) {
        let mut slots = match self.write_slots() {
            Ok(slots) => slots,
            Err(err) => {
                warn!(service = name, error = %err, "Dropping service load outcome");
                return;
            }
        };
        let current = matches!(
            slots.get(name),
            Some(Slot::Pending { generation: g, .. }) if *g == generation
        );
        if !current {
            debug!(service = name, "Discarding stale service load outcome");
            return;
        }
        match outcome {
            Ok(instance) => {
                slots.insert(name.to_string(), Slot::Resolved(instance));
                info!(service = name, "Service resolved");
                self.emit(ServiceEvent::Resolved {
                    service: name.to_string(),
                });
            }
            Err(failure) => {
                warn!(service = name, error = %failure, "Service load failed");
                self.emit(ServiceEvent::LoadFailed {
                    service: name.to_string(),
                    message: failure.message.clone(),
                });
                slots.insert(name.to_string(), Slot::Failed(failure));
            }
        }
    }

    /// Publish a lifecycle event, ignoring the no-subscriber case
    fn emit(&self, event: ServiceEvent) {
        match self.inner.events.send(event) {
            Ok(count) => debug!(subscribers = count, "Published service event"),
            Err(_) => debug!("Published service event but no subscribers"),
        }
    }

    fn read_slots(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Slot<T>>>> {
        self.inner
            .slots
            .read()
            .map_err(|_| Error::internal("service slot lock poisoned"))
    }

    fn write_slots(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Slot<T>>>> {
        self.inner
            .slots
            .write()
            .map_err(|_| Error::internal("service slot lock poisoned"))
    }
}
