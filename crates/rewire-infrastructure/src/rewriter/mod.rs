//! Post-compilation rewriting of module directories

pub mod report;
pub mod tree;

pub use report::{FileOutcome, FileReport, RewriteReport};
pub use tree::TreeRewriter;
