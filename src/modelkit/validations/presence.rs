use super::EachValidator;
use crate::errors::ErrorKind;
use crate::value::Value;

/// Value must not be blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct Presence;

impl EachValidator for Presence {
    fn kind(&self) -> &'static str {
        "presence"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        if value.is_blank() {
            vec![ErrorKind::Blank]
        } else {
            Vec::new()
        }
    }
}

/// Value must be blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absence;

impl EachValidator for Absence {
    fn kind(&self) -> &'static str {
        "absence"
    }

    fn check(&self, value: &Value) -> Vec<ErrorKind> {
        if value.is_present() {
            vec![ErrorKind::Present]
        } else {
            Vec::new()
        }
    }
}
