//! Per-attribute validators.

use super::{Validatable, Validator};
use crate::errors::ErrorKind;
use crate::value::Value;

/// A check applied to one attribute value at a time.
pub trait EachValidator: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Error kinds for `value`; empty when it passes.
    fn check(&self, value: &Value) -> Vec<ErrorKind>;

    /// Whether nil skips the check when the caller did not say.
    fn allows_nil_by_default(&self) -> bool {
        false
    }
}

/// Runs an [`EachValidator`] over a list of attributes.
pub struct AttributeValidator<V> {
    attributes: Vec<String>,
    check: V,
    allow_nil: Option<bool>,
    allow_blank: bool,
    message: Option<String>,
}

impl<V: EachValidator> AttributeValidator<V> {
    pub fn new<I, S>(attributes: I, check: V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            check,
            allow_nil: None,
            allow_blank: false,
            message: None,
        }
    }

    /// Skip nil values.
    pub fn allow_nil(mut self, allow: bool) -> Self {
        self.allow_nil = Some(allow);
        self
    }

    /// Skip blank values (nil, false, whitespace, empty list).
    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    /// Replace the catalog message for every error this validator adds.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn skips(&self, value: &Value) -> bool {
        let allow_nil = self
            .allow_nil
            .unwrap_or_else(|| self.check.allows_nil_by_default());
        (allow_nil && value.is_nil()) || (self.allow_blank && value.is_blank())
    }
}

impl<R, V> Validator<R> for AttributeValidator<V>
where
    R: Validatable,
    V: EachValidator,
{
    fn validate(&self, record: &mut R) {
        for attribute in &self.attributes {
            let value = record.read_attribute(attribute);
            if self.skips(&value) {
                continue;
            }
            for kind in self.check.check(&value) {
                let errors = record.errors_mut();
                match &self.message {
                    Some(message) => errors.add_kind_with_message(attribute.as_str(), kind, message.as_str()),
                    None => errors.add_kind(attribute.as_str(), kind),
                }
            }
        }
    }

    fn kind(&self) -> &'static str {
        self.check.kind()
    }

    fn attributes(&self) -> Vec<String> {
        self.attributes.clone()
    }
}
