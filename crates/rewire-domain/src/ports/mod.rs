//! Domain ports
//!
//! Interfaces implemented by the application layer and by user code.

pub mod configuration;
pub mod provider;

pub use configuration::{Configuration, ProviderBody, ProviderMethod};
pub use provider::Provider;
