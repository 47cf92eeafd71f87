//! Configuration object port
//!
//! A configuration object publishes its provider methods through an explicit
//! table instead of runtime reflection. Each entry carries the "provides"
//! marker (the symbolic name), the declared parameter list and the body.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::value_objects::Value;

/// Body of a provider method
///
/// Receives the call arguments; nullary provider methods are invoked with an
/// empty slice.
pub type ProviderBody = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A method of a configuration object carrying a "provides" marker
#[derive(Clone)]
pub struct ProviderMethod {
    provides: String,
    method: String,
    parameters: Vec<String>,
    body: ProviderBody,
}

impl ProviderMethod {
    /// Declare a zero-argument provider method
    pub fn nullary<P, M, F>(provides: P, method: M, body: F) -> Self
    where
        P: Into<String>,
        M: Into<String>,
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            provides: provides.into(),
            method: method.into(),
            parameters: Vec::new(),
            body: Arc::new(move |_| body()),
        }
    }

    /// Declare a provider method with parameters
    ///
    /// Such declarations are expressible so that registration can reject them.
    pub fn with_params<P, M, F>(provides: P, method: M, parameters: &[&str], body: F) -> Self
    where
        P: Into<String>,
        M: Into<String>,
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            provides: provides.into(),
            method: method.into(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            body: Arc::new(body),
        }
    }

    /// Symbolic name from the "provides" marker
    pub fn provides(&self) -> &str {
        &self.provides
    }

    /// Method name, used in diagnostics
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Declared parameter names
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// The method body
    pub fn body(&self) -> &ProviderBody {
        &self.body
    }
}

impl fmt::Debug for ProviderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderMethod")
            .field("provides", &self.provides)
            .field("method", &self.method)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A configuration object exposing provider methods
///
/// Provider bodies are bound to the configuration instance by capturing the
/// `Arc<Self>` handed to [`Configuration::provider_methods`].
///
/// # Example
///
/// ```ignore
/// struct Config { hits: AtomicI64 }
///
/// impl Configuration for Config {
///     fn provider_methods(self: Arc<Self>) -> Vec<ProviderMethod> {
///         vec![ProviderMethod::nullary("singleton", "singleton", move || {
///             let n = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
///             Ok(Value::from(format!("singleton! {n}")))
///         })]
///     }
/// }
/// ```
pub trait Configuration: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// All marked provider methods, bound to this instance
    fn provider_methods(self: Arc<Self>) -> Vec<ProviderMethod>;
}
