//! Infrastructure layer constants
//!
//! Module format constants live in `rewire_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "rewire.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "rewire";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "REWIRE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_FILTER: &str = "REWIRE_LOG";

/// File name prefix used when the log path has no stem
pub const LOG_FILE_PREFIX: &str = "rewire";
