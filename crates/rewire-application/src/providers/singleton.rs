//! Singleton provider
//!
//! Computes its value at most once, on first demand, and shares it with every
//! caller. Concurrent callers arriving during the computation block until the
//! winner stores the value.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rewire_domain::error::{Error, Result};
use rewire_domain::ports::Provider;
use tracing::{debug, warn};

use super::Getter;

/// Memoizing provider
///
/// State moves from uninitialized to initialized exactly once and never back.
/// A failed computation is reported to the caller and leaves the provider
/// uninitialized, so the next `get()` retries.
pub struct SingletonProvider<T> {
    name: String,
    getter: Getter<T>,
    instance: OnceCell<T>,
}

impl<T> SingletonProvider<T> {
    /// Wrap a zero-argument getter
    pub fn new<S, F>(name: S, getter: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self::from_getter(name, Arc::new(getter))
    }

    /// Wrap an already shared getter
    pub fn from_getter<S: Into<String>>(name: S, getter: Getter<T>) -> Self {
        Self {
            name: name.into(),
            getter,
            instance: OnceCell::new(),
        }
    }

    /// Provider name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the value has been computed
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl<T> Provider<T> for SingletonProvider<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self) -> Result<T> {
        self.instance
            .get_or_try_init(|| {
                debug!(provider = %self.name, "Computing singleton value");
                (self.getter)().map_err(|err| {
                    warn!(provider = %self.name, error = %err, "Singleton computation failed");
                    match err {
                        Error::Provider { .. } => err,
                        other => Error::provider(&self.name, other.to_string()),
                    }
                })
            })
            .cloned()
    }
}

impl<T> fmt::Debug for SingletonProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonProvider")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
