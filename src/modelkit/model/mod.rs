//! # Record
//!
//! [`Record`] is the composition root. It holds the shared [`Schema`] of its
//! type plus per-instance state: one [`ChangeTracker`], one
//! [`ErrorCollection`], and whether it has been persisted.
//!
//! ## Lifecycle
//!
//! ```text
//! create / update        save
//!      │                   │
//!      ▼                   ▼
//! chain "create"|"update"  chain "save" ──► core: create or update chain
//!      │
//!      ▼ core
//! validate (Create | Update context) ──invalid──► Completed(false)
//!      │ valid
//!      ▼
//! persistence body ──false──► Completed(false)
//!      │ true
//!      ▼
//! Completed(true) ──► commit changes, mark persisted
//! ```
//!
//! After hooks of these actions only run when the core reports `true`. A
//! halted chain leaves the record and its changes untouched, and a hook fault
//! also restores whether the record counts as persisted.

pub(crate) mod dirty_methods;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::callbacks::ChainOutcome;
use crate::conversion::Conversion;
use crate::dirty::{Change, ChangeTracker};
use crate::error::{ModelError, Result};
use crate::errors::ErrorCollection;
use crate::naming::ModelName;
use crate::schema::Schema;
use crate::serialization::Serialization;
use crate::validations::{Validatable, ValidationContext, ValidationRunner};
use crate::value::Value;

#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    tracker: ChangeTracker,
    errors: ErrorCollection,
    persisted: bool,
}

impl Record {
    /// New, unsaved record with every attribute at its default.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let defaults = schema
            .registry
            .attributes()
            .iter()
            .map(|spec| (spec.name.clone(), spec.default.clone()));
        let mut tracker = ChangeTracker::new(defaults);
        if let Some(equality) = &schema.equality {
            tracker = tracker.with_equality(Arc::clone(equality));
        }
        Self {
            schema: Arc::clone(schema),
            tracker,
            errors: ErrorCollection::with_formatter(Arc::clone(&schema.formatter)),
            persisted: false,
        }
    }

    /// New record with `attributes` assigned. The assignments count as changes.
    pub fn with_attributes<I, K, V>(schema: &Arc<Schema>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        record.assign_attributes(attributes)?;
        Ok(record)
    }

    /// Persisted record carrying already-stored values, with no changes.
    pub fn instantiate<I, K, V>(schema: &Arc<Schema>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::with_attributes(schema, attributes)?;
        record.tracker.clear_changes_information();
        record.persisted = true;
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn canonical(&self, name: &str) -> Result<String> {
        self.schema
            .registry
            .canonical(name)
            .map(str::to_string)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))
    }

    /// Canonical name when declared, `name` otherwise.
    fn resolve_name(&self, name: &str) -> String {
        self.canonical(name).unwrap_or_else(|_| name.to_string())
    }

    // --- attributes ---

    pub fn read(&self, name: &str) -> Result<&Value> {
        let attr = self.canonical(name)?;
        self.tracker.read(&attr)
    }

    pub fn write(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let attr = self.canonical(name)?;
        self.tracker.write(&attr, value.into())
    }

    /// Write several attributes. Nothing is written unless every name is declared.
    pub fn assign_attributes<I, K, V>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let resolved = attributes
            .into_iter()
            .map(|(name, value)| Ok((self.canonical(name.as_ref())?, value.into())))
            .collect::<Result<Vec<(String, Value)>>>()?;
        for (attr, value) in resolved {
            self.tracker.write(&attr, value)?;
        }
        Ok(())
    }

    /// Current values, in declaration order.
    pub fn attributes(&self) -> Vec<(&str, &Value)> {
        self.schema
            .registry
            .attribute_names()
            .filter_map(|name| self.tracker.read(name).ok().map(|v| (name, v)))
            .collect()
    }

    /// Invoke a method by name: a registered attribute method pattern, or a
    /// plain attribute read.
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value> {
        let schema = Arc::clone(&self.schema);
        if let Some(found) = schema.registry.resolve(method) {
            return found.invoke(self, args);
        }
        if schema.registry.is_declared(method) {
            expect_args(method, args, 0)?;
            return self.read(method).cloned();
        }
        Err(ModelError::NoSuchMethod(method.to_string()))
    }

    /// Whether [`call`](Self::call) would find `method`.
    pub fn respond_to(&self, method: &str) -> bool {
        self.schema.registry.resolve(method).is_some() || self.schema.registry.is_declared(method)
    }

    // --- dirty tracking ---
    //
    // Predicates and lookups (`attribute_changed`, `attribute_change`,
    // `attribute_previously_*`) answer false or `None` for undeclared names.
    // Accessors that return a value or mutate (`attribute_was`,
    // `restore_attributes`, `clear_attribute_changes`) report
    // `UnknownAttribute`.

    pub fn changed(&self) -> bool {
        self.tracker.any_changed()
    }

    pub fn changed_attributes(&self) -> BTreeSet<String> {
        self.tracker.changed_attributes()
    }

    pub fn changes(&self) -> BTreeMap<String, Change> {
        self.tracker.changes()
    }

    pub fn attribute_changed(&self, name: &str) -> bool {
        self.tracker.is_changed(&self.resolve_name(name))
    }

    pub fn attribute_change(&self, name: &str) -> Option<Change> {
        self.tracker.attribute_change(&self.resolve_name(name))
    }

    pub fn attribute_was(&self, name: &str) -> Result<&Value> {
        let attr = self.canonical(name)?;
        self.tracker.attribute_was(&attr)
    }

    /// Whether `name` changed, optionally from and to specific values.
    pub fn attribute_changed_from_to(
        &self,
        name: &str,
        from: Option<&Value>,
        to: Option<&Value>,
    ) -> bool {
        self.tracker.changed_from_to(&self.resolve_name(name), from, to)
    }

    pub fn previous_changes(&self) -> &BTreeMap<String, Change> {
        self.tracker.previous_changes()
    }

    pub fn attribute_previously_changed(&self, name: &str) -> bool {
        self.tracker.previously_changed(&self.resolve_name(name))
    }

    pub fn attribute_previous_change(&self, name: &str) -> Option<&Change> {
        self.tracker.previous_change(&self.resolve_name(name))
    }

    pub fn attribute_previously_was(&self, name: &str) -> Option<&Value> {
        self.tracker.previously_was(&self.resolve_name(name))
    }

    /// Restore the given attributes to their original values.
    pub fn restore_attributes(&mut self, names: &[&str]) -> Result<()> {
        let attrs = names
            .iter()
            .map(|name| self.canonical(name))
            .collect::<Result<Vec<_>>>()?;
        let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
        self.tracker.restore(&attrs)
    }

    /// Forget changes to `names` while keeping their current values.
    pub fn clear_attribute_changes(&mut self, names: &[&str]) -> Result<()> {
        let attrs = names
            .iter()
            .map(|name| self.canonical(name))
            .collect::<Result<Vec<_>>>()?;
        let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
        self.tracker.clear_attribute_changes(&attrs);
        Ok(())
    }

    pub fn clear_changes_information(&mut self) {
        self.tracker.clear_changes_information();
    }

    /// Make the current changes the previous changes.
    pub fn commit_changes(&mut self) {
        self.tracker.commit();
    }

    /// Undo every uncommitted change. Returns the restored attributes.
    pub fn rollback(&mut self) -> Vec<String> {
        self.tracker.rollback()
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    // --- validation ---

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }

    /// Context used by [`valid`](Self::valid): create for new records,
    /// update for persisted ones.
    pub fn default_validation_context(&self) -> ValidationContext {
        if self.persisted {
            ValidationContext::Update
        } else {
            ValidationContext::Create
        }
    }

    /// Run validations without callbacks.
    pub fn valid(&mut self) -> bool {
        let context = self.default_validation_context();
        self.valid_in(&context)
    }

    pub fn valid_in(&mut self, context: &ValidationContext) -> bool {
        let schema = Arc::clone(&self.schema);
        ValidationRunner::run(self, &schema.validators, context)
    }

    pub fn invalid(&mut self) -> bool {
        !self.valid()
    }

    // --- lifecycle ---

    pub fn create(&mut self) -> Result<ChainOutcome<bool>> {
        self.create_with(accept)
    }

    /// Validate and, when valid, run `body` to store the record.
    ///
    /// `body` returns whether storing succeeded.
    pub fn create_with<F>(&mut self, body: F) -> Result<ChainOutcome<bool>>
    where
        F: FnOnce(&mut Record) -> Result<bool>,
    {
        let was_persisted = self.persisted;
        let result = self.run_create(body);
        self.settle("create", was_persisted, result)
    }

    pub fn update(&mut self) -> Result<ChainOutcome<bool>> {
        self.update_with(accept)
    }

    pub fn update_with<F>(&mut self, body: F) -> Result<ChainOutcome<bool>>
    where
        F: FnOnce(&mut Record) -> Result<bool>,
    {
        let was_persisted = self.persisted;
        let result = self.run_update(body);
        self.settle("update", was_persisted, result)
    }

    pub fn save(&mut self) -> Result<ChainOutcome<bool>> {
        self.save_with(accept)
    }

    /// Run the save chain around create (new record) or update (persisted).
    pub fn save_with<F>(&mut self, body: F) -> Result<ChainOutcome<bool>>
    where
        F: FnOnce(&mut Record) -> Result<bool>,
    {
        let schema = Arc::clone(&self.schema);
        let was_persisted = self.persisted;
        let outer = schema.callbacks.run_guarded(
            "save",
            self,
            |record: &mut Record| {
                if record.persisted {
                    record.run_update(body)
                } else {
                    record.run_create(body)
                }
            },
            |inner: &ChainOutcome<bool>| inner.succeeded(),
        );
        let result = outer.map(|outer| match outer {
            ChainOutcome::Completed(inner) => inner,
            ChainOutcome::Halted(point) => ChainOutcome::Halted(point),
        });
        self.settle("save", was_persisted, result)
    }

    /// Run `core` through the callbacks of a custom action.
    pub fn run_callbacks<T, F>(&mut self, action: &str, core: F) -> Result<ChainOutcome<T>>
    where
        F: FnOnce(&mut Record) -> Result<T>,
    {
        let schema = Arc::clone(&self.schema);
        schema.callbacks.chain(action)?;
        schema.callbacks.run(action, self, core)
    }

    fn run_create<F>(&mut self, body: F) -> Result<ChainOutcome<bool>>
    where
        F: FnOnce(&mut Record) -> Result<bool>,
    {
        let schema = Arc::clone(&self.schema);
        schema.callbacks.run_guarded(
            "create",
            self,
            |record: &mut Record| {
                if !record.valid_in(&ValidationContext::Create) {
                    return Ok(false);
                }
                if !body(record)? {
                    return Ok(false);
                }
                record.persisted = true;
                Ok(true)
            },
            |ok: &bool| *ok,
        )
    }

    fn run_update<F>(&mut self, body: F) -> Result<ChainOutcome<bool>>
    where
        F: FnOnce(&mut Record) -> Result<bool>,
    {
        let schema = Arc::clone(&self.schema);
        schema.callbacks.run_guarded(
            "update",
            self,
            |record: &mut Record| {
                if !record.valid_in(&ValidationContext::Update) {
                    return Ok(false);
                }
                body(record)
            },
            |ok: &bool| *ok,
        )
    }

    /// Commit on success. A fault leaves the record as it was before the
    /// action, so a failed create is retried as a create.
    fn settle(
        &mut self,
        action: &str,
        was_persisted: bool,
        result: Result<ChainOutcome<bool>>,
    ) -> Result<ChainOutcome<bool>> {
        match result {
            Ok(outcome) => {
                self.finish(action, &outcome);
                Ok(outcome)
            }
            Err(err) => {
                self.persisted = was_persisted;
                Err(err)
            }
        }
    }

    fn finish(&mut self, action: &str, outcome: &ChainOutcome<bool>) {
        match outcome {
            ChainOutcome::Completed(true) => {
                self.tracker.commit();
                info!(model = %self.schema.name(), action, "record saved");
            }
            ChainOutcome::Completed(false) => {
                debug!(
                    model = %self.schema.name(),
                    action,
                    errors = self.errors.len(),
                    "record not saved"
                );
            }
            ChainOutcome::Halted(point) => {
                debug!(model = %self.schema.name(), action, at = %point, "record not saved, halted");
            }
        }
    }

    // --- naming ---

    pub fn model_name(&self) -> ModelName {
        self.schema.model_name()
    }

    pub fn human_attribute_name(&self, attribute: &str) -> String {
        self.schema.human_attribute_name(attribute)
    }
}

/// Default persistence body: nothing to store.
fn accept(_: &mut Record) -> Result<bool> {
    Ok(true)
}

pub(crate) fn expect_args(method: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ModelError::WrongArguments {
            method: method.to_string(),
            expected,
            given: args.len(),
        })
    }
}

impl Validatable for Record {
    fn read_attribute(&self, attribute: &str) -> Value {
        self.read(attribute).cloned().unwrap_or_default()
    }

    fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }
}

impl Conversion for Record {
    fn persisted(&self) -> bool {
        self.persisted
    }

    fn key_values(&self) -> Vec<Value> {
        self.schema
            .primary_key()
            .iter()
            .map(|attr| self.read_attribute(attr))
            .collect()
    }
}

impl Serialization for Record {
    fn serializable_attributes(&self) -> Vec<(String, Value)> {
        self.attributes()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("model", &self.schema.name())
            .field("attributes", &self.attributes())
            .field("changes", &self.changes())
            .field("errors", &self.errors)
            .field("persisted", &self.persisted)
            .finish()
    }
}
