//! Runtime values
//!
//! Values flowing through providers, call sites and the module interpreter.
//! Every variant is cheap to clone and safe to share across threads.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

/// A value produced by a provider or computed by module code
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// Immutable string
    Str(Arc<str>),
    /// Reference to a module instance
    Object(Arc<Instance>),
}

impl Value {
    /// Create a string value
    pub fn str<S: AsRef<str>>(value: S) -> Self {
        Self::Str(Arc::from(value.as_ref()))
    }

    /// Whether the value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Instance payload, if any
    pub fn as_object(&self) -> Option<&Arc<Instance>> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Str(_) => "str",
            Self::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    /// Objects compare by identity, everything else by content
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::Object(instance) => write!(f, "<{} instance>", instance.module()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

/// An instance of a loaded module
///
/// Holds one slot per declared field. Slots start out `Null`.
#[derive(Debug)]
pub struct Instance {
    module: String,
    fields: RwLock<Vec<Value>>,
}

impl Instance {
    /// Create an instance with `field_count` null slots
    pub fn new<S: Into<String>>(module: S, field_count: usize) -> Arc<Self> {
        Arc::new(Self {
            module: module.into(),
            fields: RwLock::new(vec![Value::Null; field_count]),
        })
    }

    /// Name of the module this instance belongs to
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Read a field slot
    pub fn get_field(&self, index: usize) -> Result<Value> {
        let fields = self
            .fields
            .read()
            .map_err(|_| Error::internal("instance field lock poisoned"))?;
        fields.get(index).cloned().ok_or_else(|| {
            Error::runtime(format!(
                "field index {index} out of range for '{}'",
                self.module
            ))
        })
    }

    /// Write a field slot
    pub fn set_field(&self, index: usize, value: Value) -> Result<()> {
        let mut fields = self
            .fields
            .write()
            .map_err(|_| Error::internal("instance field lock poisoned"))?;
        let slot = fields.get_mut(index).ok_or_else(|| {
            Error::runtime(format!(
                "field index {index} out of range for '{}'",
                self.module
            ))
        })?;
        *slot = value;
        Ok(())
    }
}
