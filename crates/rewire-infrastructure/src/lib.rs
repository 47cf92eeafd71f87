//! Infrastructure Layer - rewire
//!
//! Cross-cutting technical concerns around the injection machinery:
//!
//! - `config`: layered settings (defaults, TOML file, environment)
//! - `logging`: tracing subscriber setup
//! - `error_ext`: context helpers converting foreign errors into domain errors
//! - `rewriter`: the post-compilation pass over a directory of RWM modules
//!
//! ## Dependencies
//!
//! - `rewire-domain`: error type, constants and module format
//! - `rewire-application`: the module rewriting use case

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod rewriter;

pub use config::{AppConfig, ConfigBuilder, ConfigLoader, LoggingConfig, RewriterConfig};
pub use error_ext::ErrorContext;
pub use rewriter::{FileOutcome, FileReport, RewriteReport, TreeRewriter};
