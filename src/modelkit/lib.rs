//! # Modelkit Architecture
//!
//! Modelkit gives **plain data holders model behavior** without a base class:
//! attribute introspection, lifecycle callbacks, change tracking and validation.
//! Each capability is a module that works on its own and composes through a
//! single record type.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record (model/)                                            │
//! │  - Per-instance state: values, changes, errors, persisted   │
//! │  - create / update / save, valid, call, dirty accessors     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  Arc<Schema>
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema (schema.rs)                                         │
//! │  - Built once per type, immutable, shared                   │
//! │  - Attribute registry, callbacks, validators, naming        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Capabilities                                               │
//! │  - attributes/   declared names, aliases, method patterns   │
//! │  - callbacks/    before / around / after chains             │
//! │  - dirty.rs      original vs. current values                │
//! │  - validations/  validators and the runner                  │
//! │  - errors/       error collection and message rendering     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The capability modules are generic over their host (`CallbackChain<H>`,
//! `AttributeRegistry<H>`, `Validator<R>`), so they can be used without
//! [`Record`] too.
//!
//! ## Key Principle: Failure Is Data
//!
//! Only programming mistakes and hook faults are `Err` values ([`ModelError`]).
//! An invalid record is a non-empty [`ErrorCollection`]; a halted callback chain
//! is [`ChainOutcome::Halted`]. Neither unwinds the caller.
//!
//! ## Example
//!
//! ```
//! use modelkit::{Flow, Record, Schema, Value};
//! use modelkit::validations::Presence;
//!
//! let schema = Schema::builder("Person")
//!     .attributes(["name", "age"])
//!     .validates(["name"], Presence)
//!     .before("create", |person: &mut Record| {
//!         let age = person.read("age")?.as_int().unwrap_or(0);
//!         Ok(if age < 0 { Flow::Halt } else { Flow::Continue })
//!     })
//!     .build()?;
//!
//! let mut person = Record::new(&schema);
//! person.write("name", "bob")?;
//! assert!(person.create()?.succeeded());
//!
//! person.write("name", "robert")?;
//! assert_eq!(person.call("name_was", &[])?, Value::str("bob"));
//! # Ok::<(), modelkit::ModelError>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` (chain runs and halts, hook faults,
//! validation runs, commits and rollbacks) and installs no subscriber.
//!
//! ## Module Overview
//!
//! - [`model`]: The [`Record`] facade
//! - [`schema`]: Per-type metadata and its builder
//! - [`attributes`]: Attribute declarations and dynamic method dispatch
//! - [`callbacks`]: Lifecycle callback chains
//! - [`dirty`]: Change tracking
//! - [`validations`]: Validators and the validation runner
//! - [`errors`]: Error collection and message formatting
//! - [`value`]: Attribute values
//! - [`naming`], [`conversion`], [`serialization`]: Collaborator boundaries
//! - [`config`]: Message configuration
//! - [`error`]: Error types

pub mod attributes;
pub mod callbacks;
pub mod condition;
pub mod config;
pub mod conversion;
pub mod dirty;
pub mod error;
pub mod errors;
pub mod model;
pub mod naming;
pub mod schema;
pub mod serialization;
pub mod validations;
pub mod value;

pub use callbacks::{ChainOutcome, Flow, HaltPoint, Hook, HookKind, InnerOutcome, Next};
pub use config::ModelConfig;
pub use conversion::Conversion;
pub use dirty::{Change, ChangeTracker};
pub use error::{ModelError, Result};
pub use errors::{ErrorCollection, ErrorDetail, ErrorKind};
pub use model::Record;
pub use naming::{Humanized, ModelName, Naming};
pub use schema::{Schema, SchemaBuilder};
pub use serialization::{SerializeOptions, Serialization};
pub use validations::{Validatable, ValidationContext, ValidatorSpec};
pub use value::Value;
