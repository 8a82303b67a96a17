//! Infrastructure constants

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "STOREFRONT";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "storefront.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "storefront";

/// Environment variable consulted for the log filter
pub const LOG_ENV_VAR: &str = "STOREFRONT_LOG";
