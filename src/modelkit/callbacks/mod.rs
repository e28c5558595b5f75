//! # Callback Chains
//!
//! A callback chain wraps a named lifecycle action (`create`, `save`, ...) with
//! ordered hooks:
//!
//! ```text
//! before[0..n]  ──halt?──► Halted
//!      │
//!      ▼
//! around[0] ─► around[1] ─► ... ─► core ─► ... unwind ... ─► around[0] done
//!      │ (a hook that never proceeds skips everything inside it)
//!      ▼
//! after[0..n]   (only when the core ran)
//! ```
//!
//! ## Halting
//!
//! Halting is a value, not a fault. A before hook returns [`Flow::Halt`]; an
//! around hook halts by not calling [`Next::proceed`]. Either way the chain
//! reports [`ChainOutcome::Halted`] with the [`HaltPoint`] and after hooks do
//! not run. Outer around hooks still finish, and learn what happened inside
//! from the [`InnerOutcome`] returned by `proceed`: `Ran` when the core
//! executed (whatever it returned), `Halted` when it was skipped.
//!
//! ## Faults
//!
//! A hook returning `Err` aborts the chain with
//! [`ModelError::Callback`](crate::ModelError::Callback). Inside an around
//! hook, `proceed` reports an inner fault as `Err(Aborted)`; propagating it
//! with `?` skips the hook's remaining code, and the chain surfaces the
//! original fault even if the hook swallows it.

mod chain;
mod registry;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub use chain::{CallbackChain, Hook};
pub use registry::Callbacks;

use crate::error::HookError;

/// Result of a before hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Before,
    Around,
    After,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::Before => "before",
            HookKind::Around => "around",
            HookKind::After => "after",
        };
        f.write_str(name)
    }
}

/// Where a chain stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaltPoint {
    pub kind: HookKind,
    /// Position of the hook within its kind, in registration order
    pub index: usize,
    pub name: Option<String>,
}

impl fmt::Display for HaltPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} '{}'", self.kind, name),
            None => write!(f, "{}[{}]", self.kind, self.index),
        }
    }
}

/// What an around hook's continuation reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerOutcome {
    /// The core body executed
    Ran,
    /// The core body was skipped by an inner hook
    Halted(HaltPoint),
}

/// Result of running an action through its chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome<T> {
    /// The core ran and returned this value
    Completed(T),
    Halted(HaltPoint),
}

impl<T> ChainOutcome<T> {
    pub fn is_halted(&self) -> bool {
        matches!(self, ChainOutcome::Halted(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ChainOutcome::Completed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ChainOutcome::Completed(value) => Some(value),
            ChainOutcome::Halted(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ChainOutcome::Completed(value) => Some(value),
            ChainOutcome::Halted(_) => None,
        }
    }

    pub fn halt_point(&self) -> Option<&HaltPoint> {
        match self {
            ChainOutcome::Halted(point) => Some(point),
            ChainOutcome::Completed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ChainOutcome<U> {
        match self {
            ChainOutcome::Completed(value) => ChainOutcome::Completed(f(value)),
            ChainOutcome::Halted(point) => ChainOutcome::Halted(point),
        }
    }
}

impl ChainOutcome<bool> {
    /// Completed and the core reported success.
    pub fn succeeded(&self) -> bool {
        matches!(self, ChainOutcome::Completed(true))
    }
}

/// Marker returned by [`Next::proceed`] when something inside faulted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("inner callback chain aborted")]
pub struct Aborted;

/// One-shot continuation handed to an around hook.
pub struct Next<'n, H> {
    inner: &'n mut dyn FnMut(&mut H) -> Result<InnerOutcome, Aborted>,
}

impl<'n, H> Next<'n, H> {
    /// Run the rest of the chain (inner hooks and the core).
    ///
    /// On `Err(Aborted)` the hook must return without doing its remaining
    /// work, which `?` does. The chain cannot stop a hook that ignores the
    /// error: its code after `proceed` still runs, and the original fault is
    /// reported anyway.
    pub fn proceed(self, host: &mut H) -> Result<InnerOutcome, Aborted> {
        (self.inner)(host)
    }
}

pub type BeforeFn<H> = Arc<dyn Fn(&mut H) -> Result<Flow, HookError> + Send + Sync>;
pub type AroundFn<H> = Arc<dyn Fn(&mut H, Next<'_, H>) -> Result<(), HookError> + Send + Sync>;
pub type AfterFn<H> = Arc<dyn Fn(&mut H) -> Result<(), HookError> + Send + Sync>;
