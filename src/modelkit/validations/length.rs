use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

/// Bounds on [`Value::length`]: characters for strings, items for lists.
///
/// Nil counts as length zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    minimum: Option<usize>,
    maximum: Option<usize>,
    is: Option<usize>,
}

impl Length {
    pub fn minimum(mut self, n: usize) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: usize) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn is(mut self, n: usize) -> Self {
        self.is = Some(n);
        self
    }

    /// `minimum..=maximum`
    pub fn within(self, minimum: usize, maximum: usize) -> Self {
        self.minimum(minimum).maximum(maximum)
    }
}

impl EachValidator for Length {
    fn kind(&self) -> &'static str {
        "length"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        let length = value.length();
        let mut kinds = Vec::new();
        if let Some(count) = self.is {
            if length != count {
                kinds.push(ErrorKind::WrongLength { count });
            }
        }
        if let Some(count) = self.minimum {
            if length < count {
                kinds.push(ErrorKind::TooShort { count });
            }
        }
        if let Some(count) = self.maximum {
            if length > count {
                kinds.push(ErrorKind::TooLong { count });
            }
        }
        kinds
    }
}
