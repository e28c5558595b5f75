//! # Schema
//!
//! Everything a record type knows about itself: attributes and aliases, the
//! dynamic-method table, lifecycle callbacks, validators, naming and message
//! settings, and the primary key. A schema is assembled once with
//! [`SchemaBuilder`], frozen by [`build`](SchemaBuilder::build), and shared by
//! every [`Record`] of the type through an `Arc`.
//!
//! ```
//! use modelkit::{Record, Schema, Value};
//! use modelkit::validations::Presence;
//!
//! let schema = Schema::builder("Person")
//!     .attributes(["name", "age"])
//!     .validates(["name"], Presence)
//!     .build()
//!     .unwrap();
//!
//! let mut person = Record::new(&schema);
//! assert!(!person.valid());
//! person.write("name", "bob").unwrap();
//! assert!(person.valid());
//! ```
//!
//! Builder steps that can fail (reserved names, overlapping method patterns,
//! hooks on undeclared actions, validators on undeclared attributes) do not
//! interrupt the chain; the first failure is returned by `build`.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::attributes::{AttributeRegistry, AttributeSpec};
use crate::callbacks::{
    AfterFn, AroundFn, BeforeFn, Callbacks, Flow, Hook, HookKind, Next,
};
use crate::config::ModelConfig;
use crate::dirty::Equality;
use crate::error::{HookError, ModelError, Result};
use crate::errors::MessageFormatter;
use crate::model::{dirty_methods, Record};
use crate::naming::{ModelName, Naming};
use crate::validations::{
    AttributeValidator, BlockValidator, ConfirmationValidator, EachValidator, FnValidator,
    Validator, ValidatorSpec,
};
use crate::value::Value;

/// Actions every schema declares.
pub const LIFECYCLE_ACTIONS: [&str; 3] = ["create", "update", "save"];

const DEFAULT_PRIMARY_KEY: &str = "id";

pub struct Schema {
    name: String,
    pub(crate) registry: AttributeRegistry<Record>,
    pub(crate) callbacks: Callbacks<Record>,
    pub(crate) validators: Vec<ValidatorSpec<Record>>,
    naming: Option<Arc<dyn Naming>>,
    pub(crate) formatter: Arc<MessageFormatter>,
    primary_key: Vec<String>,
    pub(crate) equality: Option<Equality>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &AttributeRegistry<Record> {
        &self.registry
    }

    pub fn callbacks(&self) -> &Callbacks<Record> {
        &self.callbacks
    }

    pub fn validators(&self) -> &[ValidatorSpec<Record>] {
        &self.validators
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn formatter(&self) -> &Arc<MessageFormatter> {
        &self.formatter
    }

    pub fn model_name(&self) -> ModelName {
        match &self.naming {
            Some(naming) => naming.model_name(),
            None => ModelName::new(self.name.as_str()),
        }
    }

    pub fn human_attribute_name(&self, attribute: &str) -> String {
        self.formatter.human_attribute_name(attribute)
    }

    /// Attribute names a validator or key refers to that are not declared.
    fn undeclared<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> Option<String> {
        names
            .into_iter()
            .find(|name| !self.registry.is_declared(name))
            .cloned()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("callbacks", &self.callbacks)
            .field("validators", &self.validators)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// Fluent builder for [`Schema`].
pub struct SchemaBuilder {
    name: String,
    registry: AttributeRegistry<Record>,
    callbacks: Callbacks<Record>,
    validators: Vec<ValidatorSpec<Record>>,
    naming: Option<Arc<dyn Naming>>,
    config: ModelConfig,
    primary_key: Option<Vec<String>>,
    equality: Option<Equality>,
    error: Option<ModelError>,
}

impl SchemaBuilder {
    /// Start a schema with the lifecycle actions declared and the dirty
    /// tracking methods (`<attr>_changed?`, `<attr>_was`, ...) installed.
    ///
    /// Because those methods are always present, an attribute may not be
    /// named like a dirty method of another one: declaring both `price` and
    /// `price_was` fails with
    /// [`ModelError::OverlappingAttributeMethodPattern`] naming `price_was`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut callbacks = Callbacks::new();
        callbacks.define(LIFECYCLE_ACTIONS);
        let mut builder = Self {
            name: name.into(),
            registry: AttributeRegistry::new(),
            callbacks,
            validators: Vec::new(),
            naming: None,
            config: ModelConfig::default(),
            primary_key: None,
            equality: None,
            error: None,
        };
        let installed = dirty_methods::install(&mut builder.registry);
        builder.record(installed);
        builder
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
    }

    fn step(mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Self {
        if self.error.is_none() {
            let result = f(&mut self);
            self.record(result);
        }
        self
    }

    /// Declare one attribute, optionally with a default.
    pub fn attribute(self, spec: impl Into<AttributeSpec>) -> Self {
        let spec = spec.into();
        self.step(|b| b.registry.declare(spec))
    }

    /// Declare nil-defaulted attributes.
    pub fn attributes<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.step(|b| b.registry.declare_all(names))
    }

    pub fn alias_attribute(self, alias: impl Into<String>, target: &str) -> Self {
        let alias = alias.into();
        let target = target.to_string();
        self.step(|b| b.registry.alias(alias, &target))
    }

    pub fn attribute_method_prefix<F>(self, prefix: &str, handler: F) -> Self
    where
        F: Fn(&mut Record, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let prefix = prefix.to_string();
        self.step(|b| b.registry.define_prefix(&prefix, handler))
    }

    pub fn attribute_method_suffix<F>(self, suffix: &str, handler: F) -> Self
    where
        F: Fn(&mut Record, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let suffix = suffix.to_string();
        self.step(|b| b.registry.define_suffix(&suffix, handler))
    }

    pub fn attribute_method_affix<F>(self, prefix: &str, suffix: &str, handler: F) -> Self
    where
        F: Fn(&mut Record, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let (prefix, suffix) = (prefix.to_string(), suffix.to_string());
        self.step(|b| b.registry.define_affix(&prefix, &suffix, handler))
    }

    /// Declare extra actions that records can run with [`Record::run_callbacks`].
    pub fn define_callbacks<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.callbacks.define(actions);
        self
    }

    pub fn before<F>(self, action: &str, handler: F) -> Self
    where
        F: Fn(&mut Record) -> std::result::Result<Flow, HookError> + Send + Sync + 'static,
    {
        self.before_hook(action, Hook::before(handler))
    }

    pub fn around<F>(self, action: &str, handler: F) -> Self
    where
        F: Fn(&mut Record, Next<'_, Record>) -> std::result::Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        self.around_hook(action, Hook::around(handler))
    }

    pub fn after<F>(self, action: &str, handler: F) -> Self
    where
        F: Fn(&mut Record) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.after_hook(action, Hook::after(handler))
    }

    /// Add a before hook built with [`Hook`] (named or guarded).
    pub fn before_hook(self, action: &str, hook: Hook<BeforeFn<Record>, Record>) -> Self {
        self.step(|b| b.callbacks.add_before(action, hook))
    }

    pub fn around_hook(self, action: &str, hook: Hook<AroundFn<Record>, Record>) -> Self {
        self.step(|b| b.callbacks.add_around(action, hook))
    }

    pub fn after_hook(self, action: &str, hook: Hook<AfterFn<Record>, Record>) -> Self {
        self.step(|b| b.callbacks.add_after(action, hook))
    }

    /// Remove a named hook added earlier.
    pub fn skip_callback(self, action: &str, kind: HookKind, name: &str) -> Self {
        self.step(|b| b.callbacks.skip(action, kind, name).map(|_| ()))
    }

    /// Run `check` on each of `attributes` with default options.
    pub fn validates<I, S, V>(self, attributes: I, check: V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        V: EachValidator + 'static,
    {
        self.validates_with(AttributeValidator::new(attributes, check))
    }

    /// Call `block` with `(record, attribute, value)` for each attribute.
    pub fn validates_each<I, S, F>(self, attributes: I, block: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut Record, &str, &Value) + Send + Sync + 'static,
    {
        self.validates_with(BlockValidator::new(attributes, block))
    }

    /// Require `<attr>_confirmation` to match `<attr>` when given.
    pub fn validates_confirmation_of<I, S>(self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validates_with(ConfirmationValidator::new(attributes))
    }

    pub fn validates_with(self, validator: impl Validator<Record> + 'static) -> Self {
        self.validation(ValidatorSpec::new(validator))
    }

    /// Record-level check.
    pub fn validate<F>(self, check: F) -> Self
    where
        F: Fn(&mut Record) + Send + Sync + 'static,
    {
        self.validates_with(FnValidator::new(check))
    }

    /// Add a validator with guards or contexts.
    pub fn validation(mut self, spec: ValidatorSpec<Record>) -> Self {
        self.validators.push(spec);
        self
    }

    /// Labels for full messages and the model name.
    pub fn naming(mut self, naming: impl Naming + 'static) -> Self {
        self.naming = Some(Arc::new(naming));
        self
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Override one message template.
    pub fn message(mut self, kind: &str, template: &str) -> Self {
        self.config = self.config.with_message(kind, template);
        self
    }

    /// Primary key attributes. Defaults to `id` when that attribute exists.
    pub fn primary_key<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Decide "changed" with `equality` instead of structural comparison.
    pub fn equality<F>(mut self, equality: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.equality = Some(Arc::new(equality));
        self
    }

    /// Freeze the schema.
    pub fn build(self) -> Result<Arc<Schema>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let explicit_key = self.primary_key.is_some();
        let primary_key = match self.primary_key {
            Some(key) => key,
            None if self.registry.is_declared(DEFAULT_PRIMARY_KEY) => {
                vec![DEFAULT_PRIMARY_KEY.to_string()]
            }
            None => Vec::new(),
        };
        let formatter = Arc::new(MessageFormatter::new(&self.config, self.naming.clone()));

        let schema = Schema {
            name: self.name,
            registry: self.registry,
            callbacks: self.callbacks,
            validators: self.validators,
            naming: self.naming,
            formatter,
            primary_key,
            equality: self.equality,
        };

        if explicit_key {
            if let Some(name) = schema.undeclared(&schema.primary_key) {
                return Err(ModelError::UnknownAttribute(name));
            }
        }
        for spec in &schema.validators {
            let attributes = spec.validator().attributes();
            if let Some(name) = schema.undeclared(&attributes) {
                return Err(ModelError::UnknownAttribute(name));
            }
        }

        debug!(
            schema = %schema.name,
            attributes = schema.registry.attributes().len(),
            validators = schema.validators.len(),
            "schema built"
        );
        Ok(Arc::new(schema))
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("error", &self.error)
            .finish()
    }
}
