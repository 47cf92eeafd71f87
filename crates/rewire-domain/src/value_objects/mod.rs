//! Value objects shared across layers

pub mod injection;
pub mod value;

pub use injection::InjectionPoint;
pub use value::{Instance, Value};
