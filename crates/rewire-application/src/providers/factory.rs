//! Factory provider

use std::fmt;
use std::sync::Arc;

use rewire_domain::error::Result;
use rewire_domain::ports::Provider;

use super::Getter;

/// Provider that recomputes its value on every call
pub struct FactoryProvider<T> {
    name: String,
    getter: Getter<T>,
}

impl<T> FactoryProvider<T> {
    /// Wrap a zero-argument getter
    pub fn new<S, F>(name: S, getter: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            getter: Arc::new(getter),
        }
    }

    /// Provider name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Provider<T> for FactoryProvider<T> {
    fn get(&self) -> Result<T> {
        (self.getter)()
    }
}

impl<T> fmt::Debug for FactoryProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryProvider")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
