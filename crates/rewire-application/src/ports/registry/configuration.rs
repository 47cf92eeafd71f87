//! Configuration Object Registry
//!
//! Auto-registration system for configuration objects.
//! Crates submit entries via `#[linkme::distributed_slice(CONFIGURATIONS)]`
//! and the injection registry discovers them at startup.

use std::sync::Arc;

use rewire_domain::ports::Configuration;

/// Registry entry for configuration objects
///
/// Each configuration object registers itself with this entry. The entry
/// contains metadata and a factory function creating the instance whose
/// provider methods will be installed.
pub struct ConfigurationEntry {
    /// Unique configuration name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function creating the configuration instance
    pub factory: fn() -> Arc<dyn Configuration>,
}

// Auto-collection via linkme distributed slices - entries are submitted at compile time
#[linkme::distributed_slice]
pub static CONFIGURATIONS: [ConfigurationEntry] = [..];

/// Instantiate every discovered configuration object
pub fn discovered_configurations() -> Vec<Arc<dyn Configuration>> {
    CONFIGURATIONS.iter().map(|entry| (entry.factory)()).collect()
}

/// List all registered configuration objects
///
/// Returns a list of (name, description) tuples. Useful for CLI help and
/// diagnostics.
pub fn list_configurations() -> Vec<(&'static str, &'static str)> {
    CONFIGURATIONS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
