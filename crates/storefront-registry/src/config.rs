//! Registry tuning knobs
//!
//! The values the original design hard-coded are configuration here: the
//! readiness poll interval and the lifecycle event channel capacity.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default readiness poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default lifecycle event channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Configuration for a [`ServiceRegistry`](crate::registry::ServiceRegistry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Interval between readiness re-checks, in milliseconds
    ///
    /// Readiness accuracy is bounded by this interval: a service may
    /// become ready up to one interval before a poll hook reports it.
    pub poll_interval_ms: u64,
    /// Capacity of the lifecycle event broadcast channel
    pub event_capacity: usize,
}

impl RegistryConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the readiness poll interval in milliseconds
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the lifecycle event channel capacity
    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }

    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
