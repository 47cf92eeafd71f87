//! Value provider port

use crate::error::Result;

/// Produces a value for an injection point
///
/// Implementations must tolerate concurrent `get()` calls from any thread.
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn Provider<Value>> = Arc::new(SingletonProvider::new("clock", body));
/// let value = provider.get()?;
/// ```
pub trait Provider<T>: Send + Sync {
    /// Obtain the value, blocking if another caller is computing it
    fn get(&self) -> Result<T>;
}
