//! # Dirty Tracking
//!
//! [`ChangeTracker`] stores the current value of every declared attribute and,
//! for attributes written since the last commit, the value they had before the
//! first write. The "changed" view is derived, never stored: an attribute is
//! changed iff its current value differs from its recorded original under the
//! tracker's equality.
//!
//! ```text
//!   write ──► original recorded (first write only), current updated
//!   commit ──► previous_changes := changes(); originals forgotten
//!   rollback ──► current := original for changed attributes; originals forgotten
//! ```
//!
//! `previous_changes` is only ever replaced wholesale by `commit`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::value::Value;

/// Caller-supplied equality used to decide whether a value changed.
pub type Equality = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// A single attribute change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub from: Value,
    pub to: Value,
}

impl Change {
    pub fn new(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Clone)]
pub struct ChangeTracker {
    current: BTreeMap<String, Value>,
    original: BTreeMap<String, Value>,
    previous: BTreeMap<String, Change>,
    equality: Option<Equality>,
}

impl ChangeTracker {
    /// Create a tracker for the given attributes and their initial values.
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            current: attributes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            original: BTreeMap::new(),
            previous: BTreeMap::new(),
            equality: None,
        }
    }

    /// Replace structural equality with a custom comparison.
    pub fn with_equality(mut self, equality: Equality) -> Self {
        self.equality = Some(equality);
        self
    }

    fn same(&self, a: &Value, b: &Value) -> bool {
        match &self.equality {
            Some(eq) => eq(a, b),
            None => a == b,
        }
    }

    fn ensure_declared(&self, attr: &str) -> Result<()> {
        if self.current.contains_key(attr) {
            Ok(())
        } else {
            Err(ModelError::UnknownAttribute(attr.to_string()))
        }
    }

    pub fn read(&self, attr: &str) -> Result<&Value> {
        self.current
            .get(attr)
            .ok_or_else(|| ModelError::UnknownAttribute(attr.to_string()))
    }

    /// Set the current value, recording the original on the first write.
    pub fn write(&mut self, attr: &str, value: Value) -> Result<()> {
        let Some(slot) = self.current.get_mut(attr) else {
            return Err(ModelError::UnknownAttribute(attr.to_string()));
        };
        let before = std::mem::replace(slot, value);
        self.original.entry(attr.to_string()).or_insert(before);
        Ok(())
    }

    /// Current values of all attributes.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.current
    }

    pub fn is_changed(&self, attr: &str) -> bool {
        match (self.original.get(attr), self.current.get(attr)) {
            (Some(orig), Some(cur)) => !self.same(orig, cur),
            _ => false,
        }
    }

    pub fn any_changed(&self) -> bool {
        self.original.keys().any(|attr| self.is_changed(attr))
    }

    pub fn changed_attributes(&self) -> BTreeSet<String> {
        self.original
            .keys()
            .filter(|attr| self.is_changed(attr))
            .cloned()
            .collect()
    }

    /// `attr -> (original, current)` for changed attributes only.
    pub fn changes(&self) -> BTreeMap<String, Change> {
        self.original
            .iter()
            .filter(|(attr, _)| self.is_changed(attr))
            .map(|(attr, orig)| {
                let to = self.current.get(attr).cloned().unwrap_or_default();
                (attr.clone(), Change::new(orig.clone(), to))
            })
            .collect()
    }

    pub fn attribute_change(&self, attr: &str) -> Option<Change> {
        if !self.is_changed(attr) {
            return None;
        }
        Some(Change::new(
            self.original.get(attr)?.clone(),
            self.current.get(attr)?.clone(),
        ))
    }

    /// Value before the pending change, or the current value when unchanged.
    pub fn attribute_was(&self, attr: &str) -> Result<&Value> {
        self.ensure_declared(attr)?;
        if self.is_changed(attr) {
            if let Some(orig) = self.original.get(attr) {
                return Ok(orig);
            }
        }
        self.read(attr)
    }

    /// Whether `attr` changed, optionally constrained on either end.
    pub fn changed_from_to(&self, attr: &str, from: Option<&Value>, to: Option<&Value>) -> bool {
        let Some(change) = self.attribute_change(attr) else {
            return false;
        };
        from.map_or(true, |f| self.same(f, &change.from))
            && to.map_or(true, |t| self.same(t, &change.to))
    }

    /// Snapshot pending changes into `previous_changes` and forget originals.
    pub fn commit(&mut self) {
        self.previous = self.changes();
        self.original.clear();
        debug!(committed = self.previous.len(), "changes applied");
    }

    /// Restore every changed attribute to its original value.
    ///
    /// Returns the restored attribute names. Previous changes are untouched.
    pub fn rollback(&mut self) -> Vec<String> {
        let restored: Vec<String> = self.changed_attributes().into_iter().collect();
        for (attr, orig) in std::mem::take(&mut self.original) {
            if let Some(slot) = self.current.get_mut(&attr) {
                *slot = orig;
            }
        }
        debug!(restored = restored.len(), "changes rolled back");
        restored
    }

    /// Roll back only the given attributes.
    pub fn restore(&mut self, attrs: &[&str]) -> Result<()> {
        for attr in attrs {
            self.ensure_declared(attr)?;
        }
        for attr in attrs {
            if let Some(orig) = self.original.remove(*attr) {
                if let Some(slot) = self.current.get_mut(*attr) {
                    *slot = orig;
                }
            }
        }
        Ok(())
    }

    /// Accept the current value of the given attributes as their original.
    pub fn clear_attribute_changes(&mut self, attrs: &[&str]) {
        for attr in attrs {
            self.original.remove(*attr);
        }
    }

    /// Forget both pending and previous changes.
    pub fn clear_changes_information(&mut self) {
        self.original.clear();
        self.previous.clear();
    }

    pub fn previous_changes(&self) -> &BTreeMap<String, Change> {
        &self.previous
    }

    pub fn previous_change(&self, attr: &str) -> Option<&Change> {
        self.previous.get(attr)
    }

    pub fn previously_changed(&self, attr: &str) -> bool {
        self.previous.contains_key(attr)
    }

    /// Value `attr` had before the last commit, if it changed then.
    pub fn previously_was(&self, attr: &str) -> Option<&Value> {
        self.previous.get(attr).map(|c| &c.from)
    }
}

impl fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("current", &self.current)
            .field("changes", &self.changes())
            .field("previous", &self.previous)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ChangeTracker {
        ChangeTracker::new([("name", Value::Nil), ("age", Value::Int(0))])
    }

    #[test]
    fn fresh_tracker_is_clean() {
        let t = tracker();
        assert!(!t.any_changed());
        assert!(t.changes().is_empty());
        assert!(t.previous_changes().is_empty());
    }

    #[test]
    fn write_marks_changed() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        assert!(t.is_changed("name"));
        assert!(!t.is_changed("age"));
        assert_eq!(t.changes()["name"], Change::new(Value::Nil, "bob"));
    }

    #[test]
    fn original_is_recorded_once() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.write("name", "robert".into()).unwrap();
        assert_eq!(t.changes()["name"], Change::new(Value::Nil, "robert"));
    }

    #[test]
    fn writing_back_original_clears_change() {
        let mut t = tracker();
        t.write("age", Value::Int(5)).unwrap();
        t.write("age", Value::Int(0)).unwrap();
        assert!(!t.is_changed("age"));
        assert!(t.changed_attributes().is_empty());
    }

    #[test]
    fn writing_same_value_is_not_a_change() {
        let mut t = tracker();
        t.write("age", Value::Int(0)).unwrap();
        assert!(!t.any_changed());
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let mut t = tracker();
        assert!(matches!(
            t.write("email", "x".into()),
            Err(ModelError::UnknownAttribute(name)) if name == "email"
        ));
        assert!(t.read("email").is_err());
    }

    #[test]
    fn commit_moves_changes_to_previous() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        let pending = t.changes();
        t.commit();
        assert!(t.changed_attributes().is_empty());
        assert_eq!(t.previous_changes(), &pending);
        assert!(t.previously_changed("name"));
        assert_eq!(t.previously_was("name"), Some(&Value::Nil));
    }

    #[test]
    fn commit_replaces_previous_changes() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.commit();
        t.write("age", Value::Int(3)).unwrap();
        t.commit();
        assert!(!t.previously_changed("name"));
        assert_eq!(t.previous_change("age"), Some(&Change::new(0, 3)));
    }

    #[test]
    fn rollback_restores_and_keeps_previous() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.commit();
        t.write("name", "robert".into()).unwrap();
        t.write("age", Value::Int(9)).unwrap();

        let mut restored = t.rollback();
        restored.sort();
        assert_eq!(restored, vec!["age", "name"]);
        assert_eq!(t.read("name").unwrap(), &Value::str("bob"));
        assert_eq!(t.read("age").unwrap(), &Value::Int(0));
        assert!(!t.any_changed());
        assert_eq!(t.previous_change("name"), Some(&Change::new(Value::Nil, "bob")));
    }

    #[test]
    fn restore_subset() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.write("age", Value::Int(9)).unwrap();
        t.restore(&["age"]).unwrap();
        assert!(t.is_changed("name"));
        assert!(!t.is_changed("age"));
        assert!(t.restore(&["nope"]).is_err());
    }

    #[test]
    fn attribute_was_and_change() {
        let mut t = tracker();
        assert_eq!(t.attribute_was("age").unwrap(), &Value::Int(0));
        t.write("age", Value::Int(4)).unwrap();
        assert_eq!(t.attribute_was("age").unwrap(), &Value::Int(0));
        assert_eq!(t.attribute_change("age"), Some(Change::new(0, 4)));
        assert_eq!(t.attribute_change("name"), None);
    }

    #[test]
    fn changed_from_to_bounds() {
        let mut t = tracker();
        t.write("age", Value::Int(4)).unwrap();
        assert!(t.changed_from_to("age", None, None));
        assert!(t.changed_from_to("age", Some(&Value::Int(0)), Some(&Value::Int(4))));
        assert!(!t.changed_from_to("age", Some(&Value::Int(1)), None));
        assert!(!t.changed_from_to("name", None, None));
    }

    #[test]
    fn clear_attribute_changes_keeps_value() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.clear_attribute_changes(&["name"]);
        assert!(!t.is_changed("name"));
        assert_eq!(t.read("name").unwrap(), &Value::str("bob"));
    }

    #[test]
    fn clear_changes_information_forgets_everything() {
        let mut t = tracker();
        t.write("name", "bob".into()).unwrap();
        t.commit();
        t.write("age", Value::Int(1)).unwrap();
        t.clear_changes_information();
        assert!(!t.any_changed());
        assert!(t.previous_changes().is_empty());
    }

    #[test]
    fn custom_equality_is_used() {
        let case_insensitive: Equality = Arc::new(|a: &Value, b: &Value| match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
            _ => a == b,
        });
        let mut t = ChangeTracker::new([("name", Value::str("Bob"))]).with_equality(case_insensitive);
        t.write("name", "BOB".into()).unwrap();
        assert!(!t.is_changed("name"));
        t.write("name", "Alice".into()).unwrap();
        assert!(t.is_changed("name"));
    }
}
