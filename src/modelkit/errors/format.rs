//! Message rendering.
//!
//! [`MessageFormatter`] is where the message catalog from [`ModelConfig`] and the
//! optional [`Naming`] collaborator meet. Without a naming collaborator, labels
//! fall back to the raw attribute key.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::kind::ErrorKind;
use crate::attributes::BASE;
use crate::config::ModelConfig;
use crate::naming::Naming;

pub struct MessageFormatter {
    naming: Option<Arc<dyn Naming>>,
    full_format: String,
    templates: BTreeMap<String, String>,
}

impl MessageFormatter {
    pub fn new(config: &ModelConfig, naming: Option<Arc<dyn Naming>>) -> Self {
        Self {
            naming,
            full_format: config.full_message_format.clone(),
            templates: config.messages.clone(),
        }
    }

    pub fn human_attribute_name(&self, attribute: &str) -> String {
        match &self.naming {
            Some(naming) => naming.human_attribute_name(attribute),
            None => attribute.to_string(),
        }
    }

    /// Message text for `kind`, with placeholders filled in.
    pub fn message_for(&self, kind: &ErrorKind) -> String {
        let template = self
            .templates
            .get(kind.key())
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_template());
        let mut message = template.to_string();
        if let Some(count) = kind.count() {
            message = message.replace("%{count}", &count);
        }
        if let ErrorKind::Confirmation { attribute } = kind {
            message = message.replace("%{attribute}", &self.human_attribute_name(attribute));
        }
        message
    }

    /// `"<label> <message>"`, or the bare message for whole-object errors.
    pub fn full_message(&self, attribute: &str, message: &str) -> String {
        if attribute == BASE {
            return message.to_string();
        }
        self.full_format
            .replace("%{attribute}", &self.human_attribute_name(attribute))
            .replace("%{message}", message)
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(&ModelConfig::default(), None)
    }
}

impl fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFormatter")
            .field("naming", &self.naming.is_some())
            .field("full_format", &self.full_format)
            .field("templates", &self.templates)
            .finish()
    }
}
