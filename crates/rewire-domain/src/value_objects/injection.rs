//! Injection point value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field declared as an injection point inside a compiled module
///
/// Discovered while scanning field markers; consumed by the rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectionPoint {
    /// Name of the owning module
    pub module: String,
    /// Index of the field in the module's field table
    pub field_index: u16,
    /// Field (slot) name
    pub slot: String,
    /// Symbolic provider name declared by the marker
    pub symbol: String,
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} <- '{}'", self.module, self.slot, self.symbol)
    }
}
