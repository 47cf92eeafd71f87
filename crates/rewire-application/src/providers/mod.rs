//! Value providers
//!
//! | Provider | Behaviour |
//! |----------|-----------|
//! | [`FactoryProvider`] | recomputes on every `get()` |
//! | [`SingletonProvider`] | computes once, shares the result |

pub mod factory;
pub mod singleton;

pub use factory::FactoryProvider;
pub use singleton::SingletonProvider;

use std::sync::Arc;

use rewire_domain::error::Result;

/// Shared zero-argument getter
pub type Getter<T> = Arc<dyn Fn() -> Result<T> + Send + Sync>;
