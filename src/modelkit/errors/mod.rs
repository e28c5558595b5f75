//! # Error Collection
//!
//! Validation never raises. Its result is an [`ErrorCollection`]: an ordered
//! multi-map from attribute name to error details. An empty collection means
//! the record is valid.
//!
//! Errors that concern the whole object rather than one attribute are stored
//! under the reserved [`BASE`] key. They share storage with attribute errors but
//! render without a label and are listed ahead of attribute keys in
//! [`ErrorCollection::to_map`].
//!
//! ## Message Pipeline
//!
//! ```text
//! add_kind("name", Blank) ──► catalog template ──► "can't be blank"
//! full_messages()         ──► naming label     ──► "Name can't be blank"
//! ```

mod format;
mod kind;

use std::fmt;
use std::sync::Arc;

pub use format::MessageFormatter;
pub use kind::{ErrorDetail, ErrorKind};

use crate::attributes::BASE;

#[derive(Clone)]
pub struct ErrorCollection {
    details: Vec<ErrorDetail>,
    formatter: Arc<MessageFormatter>,
}

impl ErrorCollection {
    /// Empty collection with default English messages and raw-key labels.
    pub fn new() -> Self {
        Self::with_formatter(Arc::new(MessageFormatter::default()))
    }

    pub fn with_formatter(formatter: Arc<MessageFormatter>) -> Self {
        Self {
            details: Vec::new(),
            formatter,
        }
    }

    /// Append a free-form message.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.details.push(ErrorDetail {
            attribute: attribute.into(),
            kind: ErrorKind::Custom,
            message: message.into(),
        });
    }

    /// Append an error whose message comes from the catalog.
    pub fn add_kind(&mut self, attribute: impl Into<String>, kind: ErrorKind) {
        let message = self.formatter.message_for(&kind);
        self.details.push(ErrorDetail {
            attribute: attribute.into(),
            kind,
            message,
        });
    }

    /// Append an error of `kind` with explicit message text.
    pub fn add_kind_with_message(
        &mut self,
        attribute: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) {
        self.details.push(ErrorDetail {
            attribute: attribute.into(),
            kind,
            message: message.into(),
        });
    }

    /// Append a whole-object error.
    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    pub fn messages(&self, attribute: &str) -> Vec<&str> {
        self.details
            .iter()
            .filter(|d| d.attribute == attribute)
            .map(|d| d.message.as_str())
            .collect()
    }

    pub fn details(&self, attribute: &str) -> Vec<&ErrorDetail> {
        self.details
            .iter()
            .filter(|d| d.attribute == attribute)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorDetail> {
        self.details.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn clear(&mut self) {
        self.details.clear();
    }

    pub fn include(&self, attribute: &str) -> bool {
        self.details.iter().any(|d| d.attribute == attribute)
    }

    /// Whether an error of `kind` was added on `attribute`.
    ///
    /// For [`ErrorKind::Custom`] use [`added_message`](Self::added_message).
    pub fn of_kind(&self, attribute: &str, kind: &ErrorKind) -> bool {
        self.details
            .iter()
            .any(|d| d.attribute == attribute && &d.kind == kind)
    }

    /// Whether an error of `kind` with the catalog message was added.
    pub fn added(&self, attribute: &str, kind: &ErrorKind) -> bool {
        let expected = self.formatter.message_for(kind);
        self.details
            .iter()
            .any(|d| d.attribute == attribute && &d.kind == kind && d.message == expected)
    }

    pub fn added_message(&self, attribute: &str, message: &str) -> bool {
        self.details
            .iter()
            .any(|d| d.attribute == attribute && d.message == message)
    }

    /// Remove and return every error on `attribute`.
    pub fn delete(&mut self, attribute: &str) -> Vec<ErrorDetail> {
        let (removed, kept): (Vec<ErrorDetail>, Vec<ErrorDetail>) = std::mem::take(&mut self.details)
            .into_iter()
            .partition(|d| d.attribute == attribute);
        self.details = kept;
        removed
    }

    /// Keys with errors: [`BASE`] first, then attributes in first-seen order.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if self.include(BASE) {
            names.push(BASE);
        }
        for detail in &self.details {
            let name = detail.attribute.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Messages grouped per key, in [`attribute_names`](Self::attribute_names) order.
    pub fn to_map(&self) -> Vec<(&str, Vec<&str>)> {
        self.attribute_names()
            .into_iter()
            .map(|name| (name, self.messages(name)))
            .collect()
    }

    /// Append all errors of `other`, keeping their rendered messages.
    pub fn merge(&mut self, other: &ErrorCollection) {
        self.details.extend(other.details.iter().cloned());
    }

    pub fn full_message(&self, attribute: &str, message: &str) -> String {
        self.formatter.full_message(attribute, message)
    }

    /// Every error rendered with its label, in insertion order.
    pub fn full_messages(&self) -> Vec<String> {
        self.details
            .iter()
            .map(|d| self.formatter.full_message(&d.attribute, &d.message))
            .collect()
    }

    pub fn full_messages_for(&self, attribute: &str) -> Vec<String> {
        self.details
            .iter()
            .filter(|d| d.attribute == attribute)
            .map(|d| self.formatter.full_message(&d.attribute, &d.message))
            .collect()
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }
}

impl Default for ErrorCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Collections are equal when they hold the same details in the same order.
impl PartialEq for ErrorCollection {
    fn eq(&self, other: &Self) -> bool {
        self.details == other.details
    }
}

impl fmt::Debug for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.details.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a ErrorDetail;
    type IntoIter = std::slice::Iter<'a, ErrorDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.details.iter()
    }
}
