//! Root configuration type

use serde::{Deserialize, Serialize};

use super::{LoggingConfig, RewriterConfig};

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Rewriter pass settings
    pub rewriter: RewriterConfig,
}
