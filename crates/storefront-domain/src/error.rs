//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Storefront service layer
#[derive(Error, Debug)]
pub enum Error {
    /// Requested service has no registered loader
    ///
    /// This indicates a configuration or programming mistake, not a
    /// transient condition, and is never retried automatically.
    #[error("Unknown service: {service}")]
    UnknownService {
        /// The service name that was requested
        service: String,
    },

    /// A registered loader failed to produce its service
    #[error(transparent)]
    Load(#[from] LoadFailure),

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Generic string-based error
    #[error("String error: {0}")]
    String(String),
}

// Basic error creation methods
impl Error {
    /// Create an unknown service error
    pub fn unknown_service<S: Into<String>>(service: S) -> Self {
        Self::UnknownService {
            service: service.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// I/O error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Failure of a single service load attempt
///
/// Unlike [`Error`], this type is `Clone`: one failed load attempt is
/// redistributed to every caller attached to the in-flight operation, so
/// the failure must be duplicable. The underlying loader error is
/// flattened into `message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Service '{service}' failed to load: {message}")]
pub struct LoadFailure {
    /// The service whose load attempt failed
    pub service: String,
    /// Description of the loader failure
    pub message: String,
}

impl LoadFailure {
    /// Create a new load failure
    pub fn new<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_display() {
        let err = Error::unknown_service("pricing");
        assert_eq!(err.to_string(), "Unknown service: pricing");
    }

    #[test]
    fn test_load_failure_propagates_through_error() {
        let failure = LoadFailure::new("catalog", "network down");
        let err = Error::from(failure.clone());
        assert_eq!(
            err.to_string(),
            "Service 'catalog' failed to load: network down"
        );
        match err {
            Error::Load(inner) => assert_eq!(inner, failure),
            other => panic!("Expected Load variant, got {other:?}"),
        }
    }

    #[test]
    fn test_configuration_with_source_chains() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::configuration_with_source("could not read config", io);
        assert!(err.to_string().contains("could not read config"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
