//! Configuration types

pub mod app;
pub mod logging;
pub mod rewriter;

pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use rewriter::RewriterConfig;
