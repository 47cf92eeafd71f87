//! Injection registry and call-site linkage

pub mod linkage;
pub mod registry;

pub use linkage::{CallSite, LinkageResolver};
pub use registry::{BoundProvider, InjectionRegistry, ProviderEntry};
