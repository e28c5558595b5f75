//! Dynamic attribute method patterns.
//!
//! A pattern is a `prefix` / `suffix` pair. Applied to an attribute name it
//! yields a method name (`clear_` + `name` + `_change`), and a method name can be
//! matched back to the attribute it was generated from.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::value::Value;

/// Handler invoked for a matched dynamic method: `(host, attribute, args)`.
pub type MethodHandler<H> = Arc<dyn Fn(&mut H, &str, &[Value]) -> Result<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPattern {
    pub prefix: String,
    pub suffix: String,
}

impl MethodPattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::new(prefix, "")
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::new("", suffix)
    }

    /// Method name generated for `attribute`.
    pub fn method_name(&self, attribute: &str) -> String {
        format!("{}{}{}", self.prefix, attribute, self.suffix)
    }

    /// Extract the attribute part of `method`, if the shape matches.
    pub fn match_attribute<'m>(&self, method: &'m str) -> Option<&'m str> {
        let rest = method.strip_prefix(self.prefix.as_str())?;
        let attr = rest.strip_suffix(self.suffix.as_str())?;
        if attr.is_empty() {
            None
        } else {
            Some(attr)
        }
    }

    /// Number of pattern characters; longer patterns win on resolution.
    pub fn specificity(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{attr}}{}", self.prefix, self.suffix)
    }
}

/// Result of resolving a method name.
pub struct MethodMatch<'r, H> {
    /// Canonical attribute name (aliases already resolved)
    pub attribute: String,
    pub pattern: &'r MethodPattern,
    pub handler: &'r MethodHandler<H>,
}

impl<H> MethodMatch<'_, H> {
    /// Invoke the handler on `host`.
    pub fn invoke(&self, host: &mut H, args: &[Value]) -> Result<Value> {
        (self.handler)(host, &self.attribute, args)
    }
}
