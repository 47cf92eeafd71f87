//! Rewriter pass configuration

use rewire_domain::constants::{INJECT_MARKER, MODULE_FILE_EXTENSION};
use serde::{Deserialize, Serialize};

/// Settings for the directory rewriting pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    /// Extension (without dot) of the files to rewrite
    pub extension: String,

    /// Marker kind identifying injection-point fields
    pub inject_marker: String,

    /// Stop at the first file that fails instead of reporting all failures
    pub fail_fast: bool,

    /// Follow symbolic links while walking the tree
    pub follow_links: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            extension: MODULE_FILE_EXTENSION.to_string(),
            inject_marker: INJECT_MARKER.to_string(),
            fail_fast: false,
            follow_links: false,
        }
    }
}
