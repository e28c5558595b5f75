//! # Validations
//!
//! Validation inspects a record and records problems in its
//! [`ErrorCollection`]. It never fails with an error value: an empty collection
//! after a run means the record is valid.
//!
//! ## Building Blocks
//!
//! - [`Validatable`]: what a record exposes to validators (attribute reads and
//!   its error collection)
//! - [`Validator`]: one check over a whole record
//! - [`EachValidator`]: a per-value check, wrapped by [`AttributeValidator`]
//!   to run over a list of attributes with `allow_nil` / `allow_blank` /
//!   `message` options
//! - [`ValidatorSpec`]: a validator plus its `if` / `unless` guards and the
//!   contexts (`on`) it applies to
//! - [`ValidationRunner`]: clears errors and runs specs in declaration order
//!
//! ## Built-in Checks
//!
//! | Validator | Error kinds |
//! |-----------|-------------|
//! | [`Presence`] / [`Absence`] | `blank` / `present` |
//! | [`Length`] | `too_short`, `too_long`, `wrong_length` |
//! | [`Format`] | `invalid` |
//! | [`Inclusion`] / [`Exclusion`] | `inclusion` / `exclusion` |
//! | [`Numericality`] | `not_a_number`, `not_an_integer`, comparisons, `odd`, `even` |
//! | [`Acceptance`] | `accepted` |
//! | [`ConfirmationValidator`] | `confirmation` |
//! | [`BlockValidator`] / [`FnValidator`] | whatever the closure adds |

mod acceptance;
mod block;
mod confirmation;
mod each;
mod format;
mod inclusion;
mod length;
mod numericality;
mod presence;
mod runner;

use std::fmt;

pub use acceptance::Acceptance;
pub use block::{BlockValidator, FnValidator};
pub use confirmation::ConfirmationValidator;
pub use each::{AttributeValidator, EachValidator};
pub use format::Format;
pub use inclusion::{Exclusion, Inclusion};
pub use length::Length;
pub use numericality::Numericality;
pub use presence::{Absence, Presence};
pub use runner::ValidationRunner;

use crate::condition::Conditions;
use crate::errors::ErrorCollection;
use crate::value::Value;

/// What validators need from a record.
pub trait Validatable {
    /// Current value of `attribute`; nil when the record has no such attribute.
    fn read_attribute(&self, attribute: &str) -> Value;

    fn errors(&self) -> &ErrorCollection;

    fn errors_mut(&mut self) -> &mut ErrorCollection;
}

/// A check over a whole record.
pub trait Validator<R>: Send + Sync {
    /// Inspect `record` and add errors to it. Must not touch anything else.
    fn validate(&self, record: &mut R);

    /// Short name used in logs.
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Attributes this validator reads. Checked against the declared set when
    /// a schema is built.
    fn attributes(&self) -> Vec<String> {
        Vec::new()
    }
}

/// When a validation run happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationContext {
    Create,
    Update,
    Named(String),
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationContext::Create => f.write_str("create"),
            ValidationContext::Update => f.write_str("update"),
            ValidationContext::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ValidationContext {
    fn from(name: &str) -> Self {
        match name {
            "create" => ValidationContext::Create,
            "update" => ValidationContext::Update,
            other => ValidationContext::Named(other.to_string()),
        }
    }
}

/// A validator with the guards that decide whether it runs.
pub struct ValidatorSpec<R> {
    validator: Box<dyn Validator<R>>,
    conditions: Conditions<R>,
    on: Vec<ValidationContext>,
}

impl<R> ValidatorSpec<R> {
    pub fn new(validator: impl Validator<R> + 'static) -> Self {
        Self::boxed(Box::new(validator))
    }

    pub fn boxed(validator: Box<dyn Validator<R>>) -> Self {
        Self {
            validator,
            conditions: Conditions::new(),
            on: Vec::new(),
        }
    }

    /// Run only when `predicate` holds.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.conditions = self.conditions.when(predicate);
        self
    }

    /// Skip when `predicate` holds.
    pub fn unless<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.conditions = self.conditions.unless(predicate);
        self
    }

    /// Restrict to a context. May be called several times.
    pub fn on(mut self, context: impl Into<ValidationContext>) -> Self {
        self.on.push(context.into());
        self
    }

    pub fn validator(&self) -> &dyn Validator<R> {
        self.validator.as_ref()
    }

    /// Whether this spec runs for `record` in `context`.
    pub fn applies(&self, record: &R, context: &ValidationContext) -> bool {
        (self.on.is_empty() || self.on.contains(context)) && self.conditions.allow(record)
    }
}

impl<R> fmt::Debug for ValidatorSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSpec")
            .field("kind", &self.validator.kind())
            .field("attributes", &self.validator.attributes())
            .field("on", &self.on)
            .field("conditions", &self.conditions)
            .finish()
    }
}
