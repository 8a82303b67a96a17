//! Service lifecycle events
//!
//! Events emitted by the service registry as named services move through
//! their load lifecycle. Consumers subscribe to these instead of polling
//! when they want push-based readiness notification.

use serde::{Deserialize, Serialize};

/// Lifecycle event for a named service
///
/// Emitted on every registry state transition. The payload carries only
/// the service name (and failure message where applicable) so events stay
/// cheap to clone across broadcast subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceEvent {
    /// A load attempt started for a service that was absent or failed
    LoadStarted {
        /// Name of the service being loaded
        service: String,
    },
    /// A service resolved and is now cached for the process lifetime
    Resolved {
        /// Name of the resolved service
        service: String,
    },
    /// A load attempt failed; a later request may retry from scratch
    LoadFailed {
        /// Name of the service whose load failed
        service: String,
        /// Description of the loader failure
        message: String,
    },
}

impl ServiceEvent {
    /// Name of the service this event is about
    pub fn service(&self) -> &str {
        match self {
            Self::LoadStarted { service }
            | Self::Resolved { service }
            | Self::LoadFailed { service, .. } => service,
        }
    }
}
