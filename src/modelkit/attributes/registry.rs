//! Per-type attribute registry.
//!
//! Holds the declared attributes, their aliases, and the dynamic-method table.
//! The registry is generic over the host `H` that handlers receive, so any data
//! holder can reuse it; [`Record`](crate::model::Record) is the usual host.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::methods::{MethodHandler, MethodMatch, MethodPattern};
use super::spec::{AttributeSpec, BASE};
use crate::error::{ModelError, Result};
use crate::value::Value;

pub struct AttributeRegistry<H> {
    attributes: Vec<AttributeSpec>,
    aliases: BTreeMap<String, String>,
    methods: Vec<(MethodPattern, MethodHandler<H>)>,
}

impl<H> AttributeRegistry<H> {
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            aliases: BTreeMap::new(),
            methods: Vec::new(),
        }
    }

    /// Declare an attribute. Redeclaring replaces the default.
    pub fn declare(&mut self, spec: impl Into<AttributeSpec>) -> Result<()> {
        let spec = spec.into();
        if spec.name == BASE {
            return Err(ModelError::ReservedAttributeName(spec.name));
        }
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == spec.name) {
            existing.default = spec.default;
            return Ok(());
        }
        self.attributes.push(spec);
        if let Err(err) = self.check_overlaps() {
            self.attributes.pop();
            return Err(err);
        }
        Ok(())
    }

    pub fn declare_with_default(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.declare(AttributeSpec::new(name).default(value))
    }

    /// Declare several nil-defaulted attributes at once.
    pub fn declare_all<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.declare(AttributeSpec::new(name))?;
        }
        Ok(())
    }

    /// Make `alias` read, write and dispatch as `target`.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<()> {
        let alias = alias.into();
        if alias == BASE {
            return Err(ModelError::ReservedAttributeName(alias));
        }
        let target = self
            .canonical(target)
            .ok_or_else(|| ModelError::UnknownAttribute(target.to_string()))?
            .to_string();
        self.aliases.insert(alias.clone(), target);
        if let Err(err) = self.check_overlaps() {
            self.aliases.remove(&alias);
            return Err(err);
        }
        Ok(())
    }

    pub fn define_prefix<F>(&mut self, prefix: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.define(MethodPattern::prefix(prefix), Arc::new(handler))
    }

    pub fn define_suffix<F>(&mut self, suffix: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.define(MethodPattern::suffix(suffix), Arc::new(handler))
    }

    pub fn define_affix<F>(&mut self, prefix: &str, suffix: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut H, &str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.define(MethodPattern::new(prefix, suffix), Arc::new(handler))
    }

    /// Register a pattern. Rejected when it collides with an existing pattern
    /// of the same length or with a plain attribute name.
    pub fn define(&mut self, pattern: MethodPattern, handler: MethodHandler<H>) -> Result<()> {
        if pattern.is_empty() {
            return Err(ModelError::OverlappingAttributeMethodPattern {
                pattern: pattern.to_string(),
                existing: "{attr}".to_string(),
            });
        }
        if let Some((existing, _)) = self.methods.iter().find(|(p, _)| *p == pattern) {
            return Err(ModelError::OverlappingAttributeMethodPattern {
                pattern: pattern.to_string(),
                existing: existing.to_string(),
            });
        }
        self.methods.push((pattern, handler));
        if let Err(err) = self.check_overlaps() {
            self.methods.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Resolve a method name to a pattern and attribute.
    ///
    /// Among matching patterns the longest one wins.
    pub fn resolve(&self, method: &str) -> Option<MethodMatch<'_, H>> {
        let mut best: Option<MethodMatch<'_, H>> = None;
        for (pattern, handler) in &self.methods {
            let Some(candidate) = pattern.match_attribute(method) else {
                continue;
            };
            let Some(attribute) = self.canonical(candidate) else {
                continue;
            };
            let better = best
                .as_ref()
                .map_or(true, |b| pattern.specificity() > b.pattern.specificity());
            if better {
                best = Some(MethodMatch {
                    attribute: attribute.to_string(),
                    pattern,
                    handler,
                });
            }
        }
        if let Some(found) = &best {
            trace!(method, attribute = %found.attribute, pattern = %found.pattern, "resolved attribute method");
        }
        best
    }

    /// Declared name for `name`, following aliases.
    pub fn canonical<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.attributes.iter().any(|a| a.name == name) {
            return Some(name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.canonical(name).is_some()
    }

    pub fn get_spec(&self, name: &str) -> Option<&AttributeSpec> {
        let name = self.canonical(name)?;
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Declared attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &MethodPattern> {
        self.methods.iter().map(|(p, _)| p)
    }

    /// Every name methods can be generated for: attributes and aliases.
    fn method_names(&self) -> Vec<&str> {
        self.attribute_names()
            .chain(self.aliases.keys().map(String::as_str))
            .collect()
    }

    /// Every generated method name must be unique among patterns of equal
    /// length and must not shadow a declared name.
    fn check_overlaps(&self) -> Result<()> {
        let names = self.method_names();
        let declared: BTreeSet<&str> = names.iter().copied().collect();
        let mut generated_by: BTreeMap<(usize, String), &MethodPattern> = BTreeMap::new();
        for (pattern, _) in &self.methods {
            for name in &names {
                let generated = pattern.method_name(name);
                if declared.contains(generated.as_str()) {
                    return Err(ModelError::OverlappingAttributeMethodPattern {
                        pattern: pattern.to_string(),
                        existing: format!("attribute {} (generated for {})", generated, name),
                    });
                }
                let key = (pattern.specificity(), generated);
                if let Some(earlier) = generated_by.get(&key) {
                    return Err(ModelError::OverlappingAttributeMethodPattern {
                        pattern: pattern.to_string(),
                        existing: format!("{} (both generate {})", earlier, key.1),
                    });
                }
                generated_by.insert(key, pattern);
            }
        }
        Ok(())
    }
}

impl<H> Default for AttributeRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for AttributeRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("attributes", &self.attributes)
            .field("aliases", &self.aliases)
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Host {
        calls: Vec<String>,
    }

    fn tag(tag: &'static str) -> impl Fn(&mut Host, &str, &[Value]) -> Result<Value> {
        move |host: &mut Host, attr: &str, _args: &[Value]| {
            host.calls.push(format!("{}:{}", tag, attr));
            Ok(Value::Nil)
        }
    }

    fn registry() -> AttributeRegistry<Host> {
        let mut registry = AttributeRegistry::new();
        registry.declare_all(["name", "age"]).unwrap();
        registry
    }

    #[test]
    fn declare_rejects_base() {
        let mut registry: AttributeRegistry<Host> = AttributeRegistry::new();
        assert!(matches!(
            registry.declare("base"),
            Err(ModelError::ReservedAttributeName(_))
        ));
    }

    #[test]
    fn redeclare_replaces_default() {
        let mut registry = registry();
        registry.declare_with_default("age", 3).unwrap();
        assert_eq!(registry.attributes().len(), 2);
        assert_eq!(registry.get_spec("age").unwrap().default, Value::Int(3));
    }

    #[test]
    fn prefix_dispatches_with_attribute() {
        let mut registry = registry();
        registry.define_prefix("reset_", tag("reset")).unwrap();

        let mut host = Host::default();
        let found = registry.resolve("reset_name").unwrap();
        assert_eq!(found.attribute, "name");
        found.invoke(&mut host, &[]).unwrap();
        assert_eq!(host.calls, vec!["reset:name"]);
    }

    #[test]
    fn undeclared_attribute_does_not_resolve() {
        let mut registry = registry();
        registry.define_prefix("reset_", tag("reset")).unwrap();
        assert!(registry.resolve("reset_email").is_none());
        assert!(registry.resolve("name").is_none());
    }

    #[test]
    fn longest_pattern_wins() {
        let mut registry = registry();
        registry.declare("name_previously").unwrap();
        registry.define_suffix("_changed?", tag("changed")).unwrap();
        registry
            .define_suffix("_previously_changed?", tag("previously"))
            .unwrap();

        let found = registry.resolve("name_previously_changed?").unwrap();
        assert_eq!(found.attribute, "name");
        assert_eq!(found.pattern.suffix, "_previously_changed?");
    }

    #[test]
    fn identical_pattern_is_rejected() {
        let mut registry = registry();
        registry.define_suffix("_was", tag("a")).unwrap();
        let err = registry.define_suffix("_was", tag("b")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::OverlappingAttributeMethodPattern { .. }
        ));
        assert_eq!(registry.patterns().count(), 1);
    }

    #[test]
    fn equal_length_collision_is_rejected() {
        // "x_" + "name" and "name" + "_x" never collide, but
        // "a_" + "b_c" and "a_b" + "_c" do when both attributes exist.
        let mut registry: AttributeRegistry<Host> = AttributeRegistry::new();
        registry.declare_all(["b_c", "a_b"]).unwrap();
        registry.define_prefix("a_", tag("p")).unwrap();
        let err = registry.define_suffix("_c", tag("s")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::OverlappingAttributeMethodPattern { .. }
        ));
    }

    #[test]
    fn declaring_attribute_that_creates_collision_is_rejected() {
        let mut registry: AttributeRegistry<Host> = AttributeRegistry::new();
        registry.declare("b_c").unwrap();
        registry.define_prefix("a_", tag("p")).unwrap();
        registry.define_suffix("_c", tag("s")).unwrap();
        assert!(registry.declare("a_b").is_err());
        assert!(!registry.is_declared("a_b"));
    }

    #[test]
    fn generated_name_matching_attribute_is_rejected() {
        let mut registry: AttributeRegistry<Host> = AttributeRegistry::new();
        registry.declare_all(["first", "first_name"]).unwrap();
        let err = registry.define_suffix("_name", tag("s")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "attribute method pattern '{attr}_name' overlaps with \
             'attribute first_name (generated for first)'"
        );
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let mut registry = registry();
        assert!(registry
            .define(MethodPattern::new("", ""), Arc::new(tag("x")))
            .is_err());
    }

    #[test]
    fn alias_resolves_to_target() {
        let mut registry = registry();
        registry.alias("full_name", "name").unwrap();
        registry.define_prefix("reset_", tag("reset")).unwrap();

        assert_eq!(registry.canonical("full_name"), Some("name"));
        let found = registry.resolve("reset_full_name").unwrap();
        assert_eq!(found.attribute, "name");
    }

    #[test]
    fn alias_to_unknown_attribute_fails() {
        let mut registry = registry();
        assert!(matches!(
            registry.alias("nick", "nickname"),
            Err(ModelError::UnknownAttribute(_))
        ));
    }
}
