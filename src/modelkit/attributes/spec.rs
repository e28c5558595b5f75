//! Attribute specifications.
//!
//! An [`AttributeSpec`] describes one declared attribute: its name and the value
//! a fresh record starts with.

use crate::value::Value;

/// Key under which whole-object errors are stored. Cannot be declared.
pub const BASE: &str = "base";

/// Specification for a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    /// The attribute name used in the API (e.g. "name", "age")
    pub name: String,

    /// Initial value for new records
    pub default: Value,
}

impl AttributeSpec {
    /// Create a new attribute spec that defaults to nil.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Value::Nil,
        }
    }

    /// Set the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }
}

impl From<&str> for AttributeSpec {
    fn from(name: &str) -> Self {
        AttributeSpec::new(name)
    }
}

impl From<String> for AttributeSpec {
    fn from(name: String) -> Self {
        AttributeSpec::new(name)
    }
}
