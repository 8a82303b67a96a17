//! Storefront domain layer
//!
//! Core types shared by every other layer: the error taxonomy and the
//! service lifecycle events. This crate stays free of runtime concerns so
//! that consumers can depend on it without pulling in tokio or the
//! configuration stack.

pub mod error;
pub mod events;

pub use error::{Error, LoadFailure, Result};
pub use events::ServiceEvent;
