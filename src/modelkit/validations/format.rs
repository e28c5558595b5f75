use once_cell::sync::Lazy;
use regex::Regex;

use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// The value's text must match `with` and must not match `without`.
///
/// Non-string values are checked against their display form.
#[derive(Debug, Clone)]
pub struct Format {
    with: Option<Regex>,
    without: Option<Regex>,
}

impl Format {
    pub fn with(pattern: Regex) -> Self {
        Self {
            with: Some(pattern),
            without: None,
        }
    }

    pub fn without(pattern: Regex) -> Self {
        Self {
            with: None,
            without: Some(pattern),
        }
    }

    /// Loose `local@domain.tld` check.
    pub fn email() -> Self {
        Self::with(EMAIL.clone())
    }

    /// Also reject values matching `pattern`.
    pub fn and_without(mut self, pattern: Regex) -> Self {
        self.without = Some(pattern);
        self
    }
}

impl EachValidator for Format {
    fn kind(&self) -> &'static str {
        "format"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        let text = value.to_string();
        let matches_with = self.with.as_ref().map_or(true, |re| re.is_match(&text));
        let matches_without = self.without.as_ref().map_or(false, |re| re.is_match(&text));
        if matches_with && !matches_without {
            Vec::new()
        } else {
            vec![ErrorKind::Invalid]
        }
    }
}
