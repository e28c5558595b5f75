use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    AfterFn, Aborted, AroundFn, BeforeFn, ChainOutcome, Flow, HaltPoint, HookKind, InnerOutcome,
    Next,
};
use crate::condition::Conditions;
use crate::error::{HookError, ModelError, Result};

/// A hook with its optional name and guards.
pub struct Hook<F, H> {
    name: Option<String>,
    handler: F,
    conditions: Conditions<H>,
}

impl<F, H> Hook<F, H> {
    fn wrap(handler: F) -> Self {
        Self {
            name: None,
            handler,
            conditions: Conditions::new(),
        }
    }

    /// Name used for halt points, errors and [`CallbackChain::skip`].
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run only when `predicate` holds.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&H) -> bool + Send + Sync + 'static,
    {
        self.conditions = self.conditions.when(predicate);
        self
    }

    /// Skip when `predicate` holds.
    pub fn unless<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&H) -> bool + Send + Sync + 'static,
    {
        self.conditions = self.conditions.unless(predicate);
        self
    }

    fn label(&self, kind: HookKind, index: usize) -> String {
        self.halt_point(kind, index).to_string()
    }

    fn halt_point(&self, kind: HookKind, index: usize) -> HaltPoint {
        HaltPoint {
            kind,
            index,
            name: self.name.clone(),
        }
    }
}

impl<H> Hook<BeforeFn<H>, H> {
    pub fn before<F>(handler: F) -> Self
    where
        F: Fn(&mut H) -> std::result::Result<Flow, HookError> + Send + Sync + 'static,
    {
        Self::wrap(Arc::new(handler))
    }
}

impl<H> Hook<AroundFn<H>, H> {
    pub fn around<F>(handler: F) -> Self
    where
        F: Fn(&mut H, Next<'_, H>) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        Self::wrap(Arc::new(handler))
    }
}

impl<H> Hook<AfterFn<H>, H> {
    pub fn after<F>(handler: F) -> Self
    where
        F: Fn(&mut H) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        Self::wrap(Arc::new(handler))
    }
}

/// The core body and, once it ran, its value.
struct Core<F, T> {
    body: Option<F>,
    value: Option<T>,
}

/// Ordered hooks for one action.
pub struct CallbackChain<H> {
    action: String,
    before: Vec<Hook<BeforeFn<H>, H>>,
    around: Vec<Hook<AroundFn<H>, H>>,
    after: Vec<Hook<AfterFn<H>, H>>,
}

impl<H> CallbackChain<H> {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            before: Vec::new(),
            around: Vec::new(),
            after: Vec::new(),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn add_before(&mut self, hook: Hook<BeforeFn<H>, H>) {
        self.before.push(hook);
    }

    pub fn add_around(&mut self, hook: Hook<AroundFn<H>, H>) {
        self.around.push(hook);
    }

    pub fn add_after(&mut self, hook: Hook<AfterFn<H>, H>) {
        self.after.push(hook);
    }

    /// Remove named hooks of `kind`. Returns whether anything was removed.
    pub fn skip(&mut self, kind: HookKind, name: &str) -> bool {
        fn remove<F, H>(hooks: &mut Vec<Hook<F, H>>, name: &str) -> bool {
            let before = hooks.len();
            hooks.retain(|h| h.name.as_deref() != Some(name));
            hooks.len() != before
        }
        match kind {
            HookKind::Before => remove(&mut self.before, name),
            HookKind::Around => remove(&mut self.around, name),
            HookKind::After => remove(&mut self.after, name),
        }
    }

    /// Number of hooks of each kind: `(before, around, after)`.
    pub fn len(&self) -> (usize, usize, usize) {
        (self.before.len(), self.around.len(), self.after.len())
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.around.is_empty() && self.after.is_empty()
    }

    /// Run `core` wrapped in this chain's hooks.
    pub fn run<T, F>(&self, host: &mut H, core: F) -> Result<ChainOutcome<T>>
    where
        F: FnOnce(&mut H) -> Result<T>,
    {
        self.run_guarded(host, core, |_: &T| true)
    }

    /// Like [`run`](Self::run), but after hooks only run when `after_if`
    /// accepts the core's value.
    pub fn run_guarded<T, F, G>(&self, host: &mut H, core: F, after_if: G) -> Result<ChainOutcome<T>>
    where
        F: FnOnce(&mut H) -> Result<T>,
        G: FnOnce(&T) -> bool,
    {
        debug!(
            action = %self.action,
            before = self.before.len(),
            around = self.around.len(),
            after = self.after.len(),
            "running callbacks"
        );

        for (index, hook) in self.before.iter().enumerate() {
            if !hook.conditions.allow(host) {
                continue;
            }
            let flow = (hook.handler)(host)
                .map_err(|source| self.fault(hook.label(HookKind::Before, index), source))?;
            if flow == Flow::Halt {
                let point = hook.halt_point(HookKind::Before, index);
                debug!(action = %self.action, at = %point, "callback chain halted");
                return Ok(ChainOutcome::Halted(point));
            }
        }

        let mut core = Core {
            body: Some(core),
            value: None,
        };
        if let InnerOutcome::Halted(point) = self.enter(0, host, &mut core)? {
            debug!(action = %self.action, at = %point, "callback chain halted");
            return Ok(ChainOutcome::Halted(point));
        }
        let Some(value) = core.value.take() else {
            unreachable!("core reported as run without producing a value");
        };

        if !after_if(&value) {
            debug!(action = %self.action, "core reported failure, skipping after callbacks");
            return Ok(ChainOutcome::Completed(value));
        }
        for (index, hook) in self.after.iter().enumerate() {
            if !hook.conditions.allow(host) {
                continue;
            }
            (hook.handler)(host)
                .map_err(|source| self.fault(hook.label(HookKind::After, index), source))?;
        }

        Ok(ChainOutcome::Completed(value))
    }

    /// Enter around hook `index`, or run the core once past the last one.
    fn enter<T, F>(&self, index: usize, host: &mut H, core: &mut Core<F, T>) -> Result<InnerOutcome>
    where
        F: FnOnce(&mut H) -> Result<T>,
    {
        let Some(hook) = self.around.get(index) else {
            if let Some(body) = core.body.take() {
                core.value = Some(body(host)?);
            }
            return Ok(InnerOutcome::Ran);
        };
        if !hook.conditions.allow(host) {
            return self.enter(index + 1, host, core);
        }

        let mut fault: Option<ModelError> = None;
        let mut reached: Option<InnerOutcome> = None;
        let result = {
            let mut inner = |h: &mut H| -> std::result::Result<InnerOutcome, Aborted> {
                match self.enter(index + 1, h, core) {
                    Ok(outcome) => {
                        reached = Some(outcome.clone());
                        Ok(outcome)
                    }
                    Err(err) => {
                        fault = Some(err);
                        Err(Aborted)
                    }
                }
            };
            (hook.handler)(host, Next { inner: &mut inner })
        };

        if let Some(err) = fault {
            return Err(err);
        }
        if let Err(source) = result {
            return Err(self.fault(hook.label(HookKind::Around, index), source));
        }
        Ok(reached.unwrap_or_else(|| {
            let point = hook.halt_point(HookKind::Around, index);
            debug!(action = %self.action, at = %point, "around callback did not proceed");
            InnerOutcome::Halted(point)
        }))
    }

    fn fault(&self, hook: String, source: HookError) -> ModelError {
        warn!(action = %self.action, hook = %hook, error = %source, "callback failed");
        ModelError::callback(&self.action, hook, source)
    }
}

fn labels<F, H>(hooks: &[Hook<F, H>], kind: HookKind) -> Vec<String> {
    hooks
        .iter()
        .enumerate()
        .map(|(index, hook)| hook.label(kind, index))
        .collect()
}

impl<H> fmt::Debug for CallbackChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackChain")
            .field("action", &self.action)
            .field("before", &labels(&self.before, HookKind::Before))
            .field("around", &labels(&self.around, HookKind::Around))
            .field("after", &labels(&self.after, HookKind::After))
            .finish()
    }
}
