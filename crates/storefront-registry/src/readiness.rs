//! Status poll hook
//!
//! Lets a consumer ask "is this service ready yet?" without forcing a
//! load. A background task re-checks [`ServiceRegistry::has`] on a fixed
//! interval and publishes the freshest answer into a watch channel, so
//! accuracy is bounded by the poll interval. Failed loads simply read as
//! "not ready"; this hook never surfaces errors.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::registry::ServiceRegistry;

/// Periodically refreshed readiness flag for one named service
///
/// Created by [`ServiceRegistry::watch_ready`]. Dropping the watch stops
/// the poll task and releases its timer.
pub struct ReadinessWatch {
    service: String,
    rx: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl ReadinessWatch {
    /// Name of the watched service
    pub fn name(&self) -> &str {
        &self.service
    }

    /// Latest observed readiness
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the service reads as ready
    ///
    /// Returns `false` if the poll task stopped before readiness was
    /// observed.
    pub async fn ready(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

impl Drop for ReadinessWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for ReadinessWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessWatch")
            .field("service", &self.service)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl<T> ServiceRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Watch readiness of a service at the configured poll interval
    pub fn watch_ready(&self, name: &str) -> ReadinessWatch {
        self.watch_ready_with_interval(name, self.config().poll_interval())
    }

    /// Watch readiness of a service at an explicit poll interval
    ///
    /// Names without a registered loader are not an error here: they
    /// simply never become ready.
    pub fn watch_ready_with_interval(&self, name: &str, period: Duration) -> ReadinessWatch {
        let period = period.max(Duration::from_millis(1));
        let (tx, rx) = watch::channel(self.has(name));
        let registry = self.clone();
        let service = name.to_string();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                let ready = registry.has(&service);
                let changed = tx.send_if_modified(|current| {
                    if *current != ready {
                        *current = ready;
                        true
                    } else {
                        false
                    }
                });
                if changed {
                    debug!(service = service, ready = ready, "Readiness changed");
                }
            }
            debug!(service = service, "Readiness poll stopped");
        });

        ReadinessWatch {
            service: name.to_string(),
            rx,
            task,
        }
    }
}
