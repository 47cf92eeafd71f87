//! Injection Registry
//!
//! Process-wide, concurrency-safe mapping from symbolic provider name to a
//! bound callable. Populated by scanning configuration objects for their
//! provider methods.
//!
//! ```text
//! Configuration ──provider_methods()──► ProviderMethod ("provides" name)
//!        │                                     │ validate: no parameters
//!        ▼                                     ▼
//! InjectionRegistry ◄── name → ProviderEntry(SingletonProvider, BoundProvider)
//!        │
//!        └── lookup(name) ──► LinkageResolver ──► CallSite
//! ```
//!
//! Registering a provider under an existing name replaces the entry.
//! Call sites that already resolved keep the callable they were given.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rewire_domain::error::{Error, Result};
use rewire_domain::ports::{Configuration, Provider, ProviderMethod};
use rewire_domain::value_objects::Value;
use tracing::{debug, info};

use crate::ports::registry::discovered_configurations;
use crate::providers::SingletonProvider;

/// Callable attached to a linked call site
///
/// Receives the instance the replaced field would have been read from. The
/// providers installed by [`InjectionRegistry::register`] ignore it.
pub type BoundProvider = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

static GLOBAL_REGISTRY: Lazy<Arc<InjectionRegistry>> =
    Lazy::new(|| Arc::new(InjectionRegistry::new()));

/// An installed provider
#[derive(Clone)]
pub struct ProviderEntry {
    name: String,
    method: String,
    provider: Arc<SingletonProvider<Value>>,
    target: BoundProvider,
}

impl ProviderEntry {
    fn from_method(method: &ProviderMethod) -> Self {
        let body = Arc::clone(method.body());
        let provider = Arc::new(SingletonProvider::new(method.provides(), move || body(&[])));
        let singleton = Arc::clone(&provider);
        let target: BoundProvider = Arc::new(move |_receiver: &Value| singleton.get());
        Self {
            name: method.provides().to_string(),
            method: method.method().to_string(),
            provider,
            target,
        }
    }

    /// Symbolic provider name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the configuration method backing this entry
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The singleton behind this entry
    pub fn provider(&self) -> &Arc<SingletonProvider<Value>> {
        &self.provider
    }

    /// The callable handed to call sites
    pub fn target(&self) -> BoundProvider {
        Arc::clone(&self.target)
    }
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("initialized", &self.provider.is_initialized())
            .finish()
    }
}

/// Name-keyed provider registry
///
/// Reads and writes may interleave freely. Installation within one
/// `register` call is not transactional: concurrent readers can observe some
/// names already replaced and others not yet.
#[derive(Default)]
pub struct InjectionRegistry {
    providers: DashMap<String, ProviderEntry>,
}

impl InjectionRegistry {
    /// Create an empty, independent registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first access
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Install the provider methods of every configuration object
    ///
    /// All provider methods are validated before anything is installed; a
    /// method declaring parameters rejects the whole call and leaves the
    /// registry unchanged. Each name then replaces any previous entry.
    /// Returns the number of providers installed.
    pub fn register(&self, configs: &[Arc<dyn Configuration>]) -> Result<usize> {
        let mut pending = Vec::new();
        for config in configs {
            let config_name = config.name().to_string();
            for method in Arc::clone(config).provider_methods() {
                check_provider(&config_name, &method)?;
                pending.push((config_name.clone(), method));
            }
        }

        let installed = pending.len();
        for (config_name, method) in pending {
            let entry = ProviderEntry::from_method(&method);
            if let Some(previous) = self.providers.insert(entry.name.clone(), entry) {
                debug!(
                    provider = %previous.name,
                    configuration = %config_name,
                    "Replaced provider entry"
                );
            } else {
                debug!(
                    provider = %method.provides(),
                    configuration = %config_name,
                    "Installed provider entry"
                );
            }
        }
        info!(
            configurations = configs.len(),
            providers = installed,
            "Registered configuration objects"
        );
        Ok(installed)
    }

    /// Install every configuration object submitted to the `CONFIGURATIONS` slice
    pub fn register_discovered(&self) -> Result<usize> {
        self.register(&discovered_configurations())
    }

    /// Callable registered under `name`
    pub fn lookup(&self, name: &str) -> Option<BoundProvider> {
        self.providers.get(name).map(|entry| entry.target())
    }

    /// Full entry registered under `name`
    pub fn entry(&self, name: &str) -> Option<ProviderEntry> {
        self.providers.get(name).map(|entry| entry.clone())
    }

    /// Value of the provider currently registered under `name`
    pub fn get(&self, name: &str) -> Result<Value> {
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::linkage(name, "<registry>"))?;
        entry.provider.get()
    }

    /// Whether a provider is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.providers.clear();
    }
}

impl fmt::Debug for InjectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

fn check_provider(config: &str, method: &ProviderMethod) -> Result<()> {
    if method.arity() > 0 {
        return Err(Error::configuration(format!(
            "The provider method must be a no-args method: {config}::{} declares {} parameter(s) for '{}'",
            method.method(),
            method.arity(),
            method.provides()
        )));
    }
    Ok(())
}
