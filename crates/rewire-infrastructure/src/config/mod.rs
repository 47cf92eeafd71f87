//! Application settings
//!
//! Layered with figment: built-in defaults, then `rewire.toml`, then
//! `REWIRE_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `REWIRE_REWRITER__FAIL_FAST=true`).

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig, RewriterConfig};
