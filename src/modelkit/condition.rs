//! `if` / `unless` guards shared by callbacks and validators.

use std::fmt;
use std::sync::Arc;

/// Predicate evaluated against the host before a hook or validator runs.
pub type Predicate<H> = Arc<dyn Fn(&H) -> bool + Send + Sync>;

/// A single guard.
pub enum Condition<H> {
    /// Run only when the predicate holds.
    If(Predicate<H>),
    /// Run only when the predicate does not hold.
    Unless(Predicate<H>),
}

impl<H> Condition<H> {
    pub fn holds(&self, host: &H) -> bool {
        match self {
            Condition::If(p) => p(host),
            Condition::Unless(p) => !p(host),
        }
    }
}

impl<H> Clone for Condition<H> {
    fn clone(&self) -> Self {
        match self {
            Condition::If(p) => Condition::If(Arc::clone(p)),
            Condition::Unless(p) => Condition::Unless(Arc::clone(p)),
        }
    }
}

/// Ordered guard list. An empty list always passes.
pub struct Conditions<H> {
    guards: Vec<Condition<H>>,
}

impl<H> Conditions<H> {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn push(&mut self, condition: Condition<H>) {
        self.guards.push(condition);
    }

    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&H) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Condition::If(Arc::new(predicate)));
        self
    }

    pub fn unless<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&H) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Condition::Unless(Arc::new(predicate)));
        self
    }

    /// All guards must hold.
    pub fn allow(&self, host: &H) -> bool {
        self.guards.iter().all(|g| g.holds(host))
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl<H> Default for Conditions<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for Conditions<H> {
    fn clone(&self) -> Self {
        Self {
            guards: self.guards.clone(),
        }
    }
}

impl<H> fmt::Debug for Conditions<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditions")
            .field("guards", &self.guards.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_conditions_allow() {
        let conditions: Conditions<i32> = Conditions::new();
        assert!(conditions.allow(&0));
    }

    #[test]
    fn when_and_unless_combine() {
        let conditions = Conditions::new()
            .when(|n: &i32| *n > 0)
            .unless(|n: &i32| *n > 10);
        assert!(conditions.allow(&5));
        assert!(!conditions.allow(&0));
        assert!(!conditions.allow(&11));
    }
}
