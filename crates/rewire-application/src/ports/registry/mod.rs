//! Configuration Registry System
//!
//! Defines the auto-registration infrastructure for configuration objects.
//! Uses the `linkme` crate for compile-time registration of configuration
//! objects that are discovered and installed at runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Configuration Registration Flow                 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Crate defines:   #[linkme::distributed_slice(CONFIGURATIONS)]│
//! │                      static ENTRY: ConfigurationEntry = ...     │
//! │                              ↓                                  │
//! │  2. Registry declares: #[linkme::distributed_slice]             │
//! │                        pub static CONFIGURATIONS: [Entry] = [..]│
//! │                              ↓                                  │
//! │  3. Startup calls:   registry.register_discovered()             │
//! │                              ↓                                  │
//! │  4. Call sites link: "clock" → SingletonProvider                │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use rewire_application::ports::registry::{ConfigurationEntry, CONFIGURATIONS};
//!
//! #[linkme::distributed_slice(CONFIGURATIONS)]
//! static CLOCK_CONFIG: ConfigurationEntry = ConfigurationEntry {
//!     name: "clock",
//!     description: "System clock providers",
//!     factory: || Arc::new(ClockConfig::default()),
//! };
//! ```

pub mod configuration;

pub use configuration::{
    CONFIGURATIONS, ConfigurationEntry, discovered_configurations, list_configurations,
};
