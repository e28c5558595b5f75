//! Closure validators.

use std::sync::Arc;

use super::{Validatable, Validator};
use crate::value::Value;

type EachFn<R> = Arc<dyn Fn(&mut R, &str, &Value) + Send + Sync>;
type RecordFn<R> = Arc<dyn Fn(&mut R) + Send + Sync>;

/// Calls a closure with `(record, attribute, value)` for each attribute.
pub struct BlockValidator<R> {
    attributes: Vec<String>,
    block: EachFn<R>,
    allow_nil: bool,
    allow_blank: bool,
}

impl<R> BlockValidator<R> {
    pub fn new<I, S, F>(attributes: I, block: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut R, &str, &Value) + Send + Sync + 'static,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            block: Arc::new(block),
            allow_nil: false,
            allow_blank: false,
        }
    }

    pub fn allow_nil(mut self, allow: bool) -> Self {
        self.allow_nil = allow;
        self
    }

    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }
}

impl<R: Validatable> Validator<R> for BlockValidator<R> {
    fn validate(&self, record: &mut R) {
        for attribute in &self.attributes {
            let value = record.read_attribute(attribute);
            if (self.allow_nil && value.is_nil()) || (self.allow_blank && value.is_blank()) {
                continue;
            }
            (self.block)(record, attribute, &value);
        }
    }

    fn kind(&self) -> &'static str {
        "block"
    }

    fn attributes(&self) -> Vec<String> {
        self.attributes.clone()
    }
}

/// Calls a closure with the whole record.
pub struct FnValidator<R> {
    check: RecordFn<R>,
}

impl<R> FnValidator<R> {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
        }
    }
}

impl<R> Validator<R> for FnValidator<R> {
    fn validate(&self, record: &mut R) {
        (self.check)(record)
    }
}
