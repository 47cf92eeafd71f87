//! Application Layer - rewire
//!
//! Implements the injection machinery on top of the domain types:
//!
//! - `providers`: factory and singleton value providers
//! - `injection`: the name-keyed injection registry, the linkage resolver and
//!   per-occurrence call sites
//! - `ports::registry`: compile-time configuration object registration
//! - `use_cases`: rewriting injection-point reads in RWM modules
//! - `runtime`: loading and executing modules with lazily linked call sites
//!
//! ## Flow
//!
//! ```text
//! configuration objects ──register──► InjectionRegistry
//!                                            │ lookup (first execution only)
//! RWM module ──ModuleRewriter──► InvokeDynamic ──► CallSite ──► SingletonProvider
//! ```
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `rewire-domain`: errors, values, ports and the module format
//! - Pure Rust libraries for concurrency and logging

pub mod injection;
pub mod ports;
pub mod providers;
pub mod runtime;
pub mod use_cases;

pub use injection::{BoundProvider, CallSite, InjectionRegistry, LinkageResolver, ProviderEntry};
pub use providers::{FactoryProvider, SingletonProvider};
pub use runtime::{Interpreter, LoadedModule, ModuleLoader};
pub use use_cases::{ModuleRewriter, RewriteSummary};
