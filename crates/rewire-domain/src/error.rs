//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rewire
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or unsupported binary module
    #[error("Module format error: {message}")]
    Format {
        /// Description of the format violation
        message: String,
    },

    /// A configuration object declares an invalid provider method
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Application settings could not be loaded or failed validation
    #[error("Settings error: {message}")]
    Config {
        /// Description of the settings error
        message: String,
    },

    /// A rewritten call site names a provider that is not registered
    #[error("Linkage error: no provider found for the injection point named '{symbol}' (slot '{slot}')")]
    Linkage {
        /// Symbolic provider name carried by the call site
        symbol: String,
        /// Slot the call site replaced
        slot: String,
    },

    /// A provider body failed while computing its value
    #[error("Provider '{name}' failed: {message}")]
    Provider {
        /// Provider name
        name: String,
        /// Description of the failure
        message: String,
    },

    /// Execution of a loaded module failed
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure
        message: String,
    },

    /// Rewriting a module failed
    #[error("Rewrite error: {message}")]
    Rewrite {
        /// Description of the rewrite failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure failure outside the categories above
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a module format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a linkage error
    pub fn linkage<S: Into<String>, T: Into<String>>(symbol: S, slot: T) -> Self {
        Self::Linkage {
            symbol: symbol.into(),
            slot: slot.into(),
        }
    }

    /// Create a provider computation error
    pub fn provider<S: Into<String>, M: Into<String>>(name: S, message: M) -> Self {
        Self::Provider {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a runtime error
    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// I/O error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create an application settings error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration object error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration object error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Rewrite error creation methods
impl Error {
    /// Create a rewrite error
    pub fn rewrite<S: Into<String>>(message: S) -> Self {
        Self::Rewrite {
            message: message.into(),
            source: None,
        }
    }

    /// Create a rewrite error with source
    pub fn rewrite_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Rewrite {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is a linkage failure
    pub fn is_linkage(&self) -> bool {
        matches!(self, Self::Linkage { .. })
    }
}
