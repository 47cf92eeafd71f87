//! # rewire
//!
//! Post-compilation dependency injection. Fields of compiled RWM modules
//! marked as injection points are rewritten into dynamically linked call
//! sites; at first execution each site binds to the provider registered under
//! its symbolic name and keeps that binding for life.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rewire::application::{InjectionRegistry, Interpreter, LinkageResolver, ModuleLoader, ModuleRewriter};
//! use rewire::domain::module::ModuleBuilder;
//! use rewire::domain::ports::{Configuration, ProviderMethod};
//! use rewire::domain::Value;
//!
//! struct Greetings;
//!
//! impl Configuration for Greetings {
//!     fn provider_methods(self: Arc<Self>) -> Vec<ProviderMethod> {
//!         vec![ProviderMethod::nullary("greeting", "greeting", || Ok(Value::from("hello")))]
//!     }
//! }
//!
//! let registry = Arc::new(InjectionRegistry::new());
//! registry.register(&[Arc::new(Greetings) as Arc<dyn Configuration>]).unwrap();
//!
//! let mut builder = ModuleBuilder::new("Greeter");
//! let greeting = builder.inject_field("greeting", "greeting").unwrap();
//! builder
//!     .method("greet", 0, 0, |m| {
//!         m.load_local_self().get_field(greeting).ret();
//!     })
//!     .unwrap();
//! let mut module = builder.build().unwrap();
//! ModuleRewriter::new().rewrite(&mut module).unwrap();
//!
//! let loaded = ModuleLoader::new().load(module).unwrap();
//! let vm = Interpreter::new(LinkageResolver::new(registry));
//! let value = vm.invoke(&loaded, "greet", loaded.new_object(), &[]).unwrap();
//! assert_eq!(value, Value::from("hello"));
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors, values, ports and the RWM module format
//! - `application` - providers, injection registry, linkage, rewriting, runtime
//! - `infrastructure` - configuration, logging and the directory rewriting pass

use std::path::Path;

use rewire_domain::error::Result;
use rewire_infrastructure::{AppConfig, RewriteReport, TreeRewriter};
use tracing::info;

/// Domain layer - errors, values, ports and module format
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use rewire_domain::*;
}

/// Application layer - injection machinery and module runtime
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use rewire_application::*;
}

/// Infrastructure layer - configuration, logging and tree rewriting
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use rewire_infrastructure::*;
}

pub use domain::{Error, Value};

/// Rewrite every module below `root` using `config`
pub fn rewrite_directory(root: &Path, config: &AppConfig) -> Result<RewriteReport> {
    info!(root = %root.display(), extension = %config.rewriter.extension, "Rewriting modules");
    TreeRewriter::new(&config.rewriter).rewrite_tree(root)
}
