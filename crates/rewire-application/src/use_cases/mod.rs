//! Application use cases

pub mod rewrite_module;

pub use rewrite_module::{ModuleRewriter, RewriteSummary};
