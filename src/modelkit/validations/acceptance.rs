use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

/// Value must be one of the accepted values (`true` or `"1"` by default).
///
/// Nil passes unless `allow_nil(false)` is set on the wrapping validator, so
/// an attribute the form never sent is not rejected.
#[derive(Debug, Clone)]
pub struct Acceptance {
    accept: Vec<Value>,
}

impl Acceptance {
    pub fn new() -> Self {
        Self {
            accept: vec![Value::Bool(true), Value::str("1")],
        }
    }

    /// Replace the accepted values.
    pub fn accept<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.accept = values.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for Acceptance {
    fn default() -> Self {
        Self::new()
    }
}

impl EachValidator for Acceptance {
    fn kind(&self) -> &'static str {
        "acceptance"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        if self.accept.contains(value) {
            Vec::new()
        } else {
            vec![ErrorKind::Accepted]
        }
    }

    fn allows_nil_by_default(&self) -> bool {
        true
    }
}
