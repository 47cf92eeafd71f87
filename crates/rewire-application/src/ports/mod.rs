//! Application ports
//!
//! - `registry`: compile-time configuration object registration

pub mod registry;

pub use registry::{CONFIGURATIONS, ConfigurationEntry, list_configurations};
