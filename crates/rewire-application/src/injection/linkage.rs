//! Linkage resolution for rewritten call sites
//!
//! Each rewritten field read becomes its own [`CallSite`]. The first time a
//! site executes it asks the [`LinkageResolver`] for the provider registered
//! under the site's symbolic name and keeps the answer for the rest of its
//! life. Later replacements in the registry are invisible to linked sites.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rewire_domain::error::{Error, Result};
use rewire_domain::value_objects::Value;
use tracing::{debug, error};

use super::registry::{BoundProvider, InjectionRegistry};

/// Binds symbolic names to provider callables
#[derive(Debug, Clone)]
pub struct LinkageResolver {
    registry: Arc<InjectionRegistry>,
}

impl LinkageResolver {
    /// Resolve against `registry`
    pub fn new(registry: Arc<InjectionRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve against the process-wide registry
    pub fn global() -> Self {
        Self::new(InjectionRegistry::global())
    }

    /// The registry consulted by this resolver
    pub fn registry(&self) -> &Arc<InjectionRegistry> {
        &self.registry
    }

    /// Look up `symbol` for the call site that replaced field `slot`
    ///
    /// A missing provider is a linkage error; there is no fallback value.
    pub fn resolve(&self, symbol: &str, slot: &str) -> Result<BoundProvider> {
        match self.registry.lookup(symbol) {
            Some(target) => {
                debug!(symbol, slot, "Linked call site");
                Ok(target)
            }
            None => {
                error!(symbol, slot, "No provider registered for injection point");
                Err(Error::linkage(symbol, slot))
            }
        }
    }
}

/// Per-occurrence linkage state of a rewritten instruction
pub struct CallSite {
    symbol: String,
    slot: String,
    target: OnceCell<BoundProvider>,
}

impl CallSite {
    /// Create an unlinked call site
    pub fn new<S: Into<String>, T: Into<String>>(symbol: S, slot: T) -> Self {
        Self {
            symbol: symbol.into(),
            slot: slot.into(),
            target: OnceCell::new(),
        }
    }

    /// Symbolic provider name embedded at rewrite time
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Name of the field this site replaced
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Whether the site has been linked
    pub fn is_linked(&self) -> bool {
        self.target.get().is_some()
    }

    /// Link the site if needed and return its callable
    ///
    /// Concurrent first executions resolve once; a failed resolution leaves
    /// the site unlinked.
    pub fn link(&self, resolver: &LinkageResolver) -> Result<&BoundProvider> {
        self.target
            .get_or_try_init(|| resolver.resolve(&self.symbol, &self.slot))
    }

    /// Execute the site with `receiver` as the sole argument
    pub fn invoke(&self, receiver: &Value, resolver: &LinkageResolver) -> Result<Value> {
        let target = self.link(resolver)?;
        target(receiver)
    }
}

impl fmt::Debug for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSite")
            .field("symbol", &self.symbol)
            .field("slot", &self.slot)
            .field("linked", &self.is_linked())
            .finish()
    }
}
