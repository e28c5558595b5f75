use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use super::chain::{CallbackChain, Hook};
use super::{AfterFn, AroundFn, BeforeFn, ChainOutcome, Flow, HookKind, Next};
use crate::error::{HookError, ModelError, Result};

/// Callback chains keyed by action name.
///
/// Actions must be declared with [`define`](Self::define) before hooks can be
/// attached to them.
pub struct Callbacks<H> {
    chains: BTreeMap<String, CallbackChain<H>>,
}

impl<H> Callbacks<H> {
    pub fn new() -> Self {
        Self {
            chains: BTreeMap::new(),
        }
    }

    /// Declare actions. Redefining an action keeps its hooks.
    pub fn define<I, S>(&mut self, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for action in actions {
            let action = action.into();
            trace!(action = %action, "defining callbacks");
            self.chains
                .entry(action.clone())
                .or_insert_with(|| CallbackChain::new(action));
        }
    }

    pub fn is_defined(&self, action: &str) -> bool {
        self.chains.contains_key(action)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn chain(&self, action: &str) -> Result<&CallbackChain<H>> {
        self.chains
            .get(action)
            .ok_or_else(|| ModelError::UndefinedCallback(action.to_string()))
    }

    pub fn chain_mut(&mut self, action: &str) -> Result<&mut CallbackChain<H>> {
        self.chains
            .get_mut(action)
            .ok_or_else(|| ModelError::UndefinedCallback(action.to_string()))
    }

    pub fn before<F>(&mut self, action: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H) -> std::result::Result<Flow, HookError> + Send + Sync + 'static,
    {
        self.add_before(action, Hook::before(handler))
    }

    pub fn around<F>(&mut self, action: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H, Next<'_, H>) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.add_around(action, Hook::around(handler))
    }

    pub fn after<F>(&mut self, action: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.add_after(action, Hook::after(handler))
    }

    pub fn add_before(&mut self, action: &str, hook: Hook<BeforeFn<H>, H>) -> Result<()> {
        self.chain_mut(action)?.add_before(hook);
        Ok(())
    }

    pub fn add_around(&mut self, action: &str, hook: Hook<AroundFn<H>, H>) -> Result<()> {
        self.chain_mut(action)?.add_around(hook);
        Ok(())
    }

    pub fn add_after(&mut self, action: &str, hook: Hook<AfterFn<H>, H>) -> Result<()> {
        self.chain_mut(action)?.add_after(hook);
        Ok(())
    }

    /// Remove a named hook. Returns whether anything was removed.
    pub fn skip(&mut self, action: &str, kind: HookKind, name: &str) -> Result<bool> {
        Ok(self.chain_mut(action)?.skip(kind, name))
    }

    /// Run `core` through the chain for `action`.
    ///
    /// An action without a chain runs the bare core.
    pub fn run<T, F>(&self, action: &str, host: &mut H, core: F) -> Result<ChainOutcome<T>>
    where
        F: FnOnce(&mut H) -> Result<T>,
    {
        self.run_guarded(action, host, core, |_: &T| true)
    }

    /// Run `core` through the chain for `action`, skipping after hooks unless
    /// `after_if` accepts the core's value.
    pub fn run_guarded<T, F, G>(
        &self,
        action: &str,
        host: &mut H,
        core: F,
        after_if: G,
    ) -> Result<ChainOutcome<T>>
    where
        F: FnOnce(&mut H) -> Result<T>,
        G: FnOnce(&T) -> bool,
    {
        match self.chains.get(action) {
            Some(chain) => chain.run_guarded(host, core, after_if),
            None => {
                trace!(action, "no callbacks defined, running core");
                core(host).map(ChainOutcome::Completed)
            }
        }
    }
}

impl<H> Default for Callbacks<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Callbacks<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.chains.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hooks_require_defined_action() {
        let mut callbacks: Callbacks<Vec<&'static str>> = Callbacks::new();
        let err = callbacks
            .before("save", |_: &mut Vec<&'static str>| Ok(Flow::Continue))
            .unwrap_err();
        assert!(matches!(err, ModelError::UndefinedCallback(ref a) if a == "save"));

        callbacks.define(["save"]);
        assert!(callbacks.is_defined("save"));
        callbacks
            .before("save", |log: &mut Vec<&'static str>| {
                log.push("before");
                Ok(Flow::Continue)
            })
            .unwrap();

        let mut log = Vec::new();
        let outcome = callbacks
            .run("save", &mut log, |log: &mut Vec<&'static str>| {
                log.push("core");
                Ok(1)
            })
            .unwrap();
        assert_eq!(outcome, ChainOutcome::Completed(1));
        assert_eq!(log, vec!["before", "core"]);
    }

    #[test]
    fn undefined_action_runs_bare_core() {
        let callbacks: Callbacks<u32> = Callbacks::new();
        let mut host = 0;
        let outcome = callbacks
            .run("destroy", &mut host, |h: &mut u32| {
                *h += 1;
                Ok(*h)
            })
            .unwrap();
        assert_eq!(outcome.into_value(), Some(1));
    }

    #[test]
    fn redefine_keeps_hooks_and_skip_removes_by_name() {
        let mut callbacks: Callbacks<u32> = Callbacks::new();
        callbacks.define(["create", "update"]);
        callbacks
            .add_after("create", Hook::after(|h: &mut u32| {
                *h += 10;
                Ok(())
            }).named("bump"))
            .unwrap();
        callbacks.define(["create"]);
        assert_eq!(callbacks.chain("create").unwrap().len(), (0, 0, 1));
        assert_eq!(callbacks.actions().collect::<Vec<_>>(), vec!["create", "update"]);

        assert!(callbacks.skip("create", HookKind::After, "bump").unwrap());
        assert!(callbacks.chain("create").unwrap().is_empty());
        assert!(callbacks.skip("destroy", HookKind::After, "bump").is_err());
    }
}
