use super::{Validatable, Validator};
use crate::errors::ErrorKind;

/// `<attr>_confirmation` must equal `<attr>` when it is present.
///
/// The error is recorded on the confirmation attribute. A nil confirmation is
/// not checked.
#[derive(Debug, Clone)]
pub struct ConfirmationValidator {
    attributes: Vec<String>,
    case_sensitive: bool,
}

impl ConfirmationValidator {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn confirmation_name(attribute: &str) -> String {
        format!("{}_confirmation", attribute)
    }
}

impl<R: Validatable> Validator<R> for ConfirmationValidator {
    fn validate(&self, record: &mut R) {
        for attribute in &self.attributes {
            let confirm_name = Self::confirmation_name(attribute);
            let confirmation = record.read_attribute(&confirm_name);
            if confirmation.is_nil() {
                continue;
            }
            let value = record.read_attribute(attribute);
            let matches = if self.case_sensitive {
                value == confirmation
            } else {
                value.to_string().to_lowercase() == confirmation.to_string().to_lowercase()
            };
            if !matches {
                record.errors_mut().add_kind(
                    confirm_name,
                    ErrorKind::Confirmation {
                        attribute: attribute.clone(),
                    },
                );
            }
        }
    }

    fn kind(&self) -> &'static str {
        "confirmation"
    }

    fn attributes(&self) -> Vec<String> {
        self.attributes
            .iter()
            .flat_map(|a| [a.clone(), Self::confirmation_name(a)])
            .collect()
    }
}
