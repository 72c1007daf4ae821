//! Rules and rule sets.
//!
//! This module provides:
//!
//! - [`Rule`]: a `(selector, priority, effect)` triple with a fluent builder
//! - [`Selector`]: the predicate deciding where a rule applies
//! - [`Apply`]: the keys a rule sets, split into [`Namespace`]s
//! - [`RuleSet`]: a validated, immutable, ordered collection of rules
//!
//! # Example
//!
//! ```rust
//! use vizrule::{Rule, RuleSet, Selector};
//!
//! let rules = RuleSet::new(vec![
//!     Rule::new()
//!         .with_priority(-5)
//!         .with_select(Selector::of_type("pentaho/ccc/visual/abstract"))
//!         .extension("margins", 0)
//!         .extension("clickable", true),
//!     Rule::new()
//!         .with_priority(-1)
//!         .with_select(Selector::of_type("pentaho/ccc/visual/abstract").in_application("pentaho-det"))
//!         .extension("selectable", false),
//! ])
//! .unwrap();
//!
//! assert_eq!(rules.len(), 2);
//! ```

mod selector;
mod set;

use std::collections::BTreeMap;

use serde::Deserialize;

pub use selector::Selector;
pub use set::RuleSet;

use crate::error::ChainError;
use crate::resolve::Invocation;
use crate::value::{Deferred, Finished, StyleValue};

/// The two independent key spaces a rule can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Model properties, usually `{value: X}` descriptors.
    Props,
    /// Renderer extension points.
    Extension,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Props => "props",
            Namespace::Extension => "extension",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The effect of a rule.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Apply {
    #[serde(default)]
    props: BTreeMap<String, StyleValue>,
    #[serde(default)]
    extension: BTreeMap<String, StyleValue>,
}

impl Apply {
    pub fn props(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn extension(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.extension.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The value this effect assigns to `key` in `namespace`.
    pub fn get(&self, namespace: Namespace, key: &str) -> Option<&StyleValue> {
        match namespace {
            Namespace::Props => self.props.get(key),
            Namespace::Extension => self.extension.get(key),
        }
    }

    /// Total number of keys across both namespaces.
    pub fn len(&self) -> usize {
        self.props.len() + self.extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.extension.is_empty()
    }

    fn insert(&mut self, namespace: Namespace, key: String, value: StyleValue) {
        match namespace {
            Namespace::Props => self.props.insert(key, value),
            Namespace::Extension => self.extension.insert(key, value),
        };
    }

    fn problem(&self) -> Option<String> {
        [(Namespace::Props, &self.props), (Namespace::Extension, &self.extension)]
            .into_iter()
            .find(|(_, map)| map.keys().any(|key| key.trim().is_empty()))
            .map(|(namespace, _)| format!("apply.{namespace} contains a blank key"))
    }
}

/// A styling rule: where it applies, how strongly, and what it sets.
///
/// Higher priorities win. Rules of equal priority apply in declaration order,
/// so the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    select: Selector,
    #[serde(default)]
    apply: Apply,
}

impl Rule {
    /// Creates a rule with priority 0 that matches everything and sets nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_select(mut self, select: Selector) -> Self {
        self.select = select;
        self
    }

    /// Sets a model property value or descriptor.
    pub fn prop<V: Into<StyleValue>>(mut self, name: &str, value: V) -> Self {
        self.apply
            .insert(Namespace::Props, name.to_string(), value.into());
        self
    }

    /// Sets an extension value, literal or [`Deferred`].
    pub fn extension<V: Into<StyleValue>>(mut self, key: &str, value: V) -> Self {
        self.apply
            .insert(Namespace::Extension, key.to_string(), value.into());
        self
    }

    /// Sets an extension to a deferred producer built from `producer`.
    pub fn extension_fn<F>(self, key: &str, producer: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<Finished, ChainError> + Send + Sync + 'static,
    {
        self.extension(key, Deferred::new(producer))
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn selector(&self) -> &Selector {
        &self.select
    }

    pub fn effect(&self) -> &Apply {
        &self.apply
    }

    /// Describes why this rule cannot be loaded, if it can't.
    pub(crate) fn problem(&self) -> Option<String> {
        self.select.problem().or_else(|| self.apply.problem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let rule = Rule::new();
        assert_eq!(rule.priority(), 0);
        assert!(rule.selector().is_universal());
        assert!(rule.effect().is_empty());
        assert!(rule.problem().is_none());
    }

    #[test]
    fn test_namespaces_are_independent() {
        let rule = Rule::new().prop("colorSet", "blue").extension("colorSet", 3);

        let effect = rule.effect();
        assert_eq!(effect.len(), 2);
        assert_eq!(
            effect.get(Namespace::Props, "colorSet"),
            Some(&StyleValue::from("blue"))
        );
        assert_eq!(
            effect.get(Namespace::Extension, "colorSet"),
            Some(&StyleValue::from(3))
        );
    }

    #[test]
    fn test_same_key_in_one_rule_keeps_last() {
        let rule = Rule::new().extension("paddings", 10).extension("paddings", 0);
        assert_eq!(
            rule.effect().get(Namespace::Extension, "paddings"),
            Some(&StyleValue::from(0))
        );
    }

    #[test]
    fn test_extension_fn_is_deferred() {
        let rule = Rule::new().extension_fn("dot_shapeRadius", |inv| Ok(inv.finished(5)));
        let value = rule.effect().get(Namespace::Extension, "dot_shapeRadius");
        assert!(value.is_some_and(StyleValue::is_deferred));
    }

    #[test]
    fn test_blank_key_is_a_problem() {
        let rule = Rule::new().extension(" ", 1);
        assert_eq!(
            rule.problem().as_deref(),
            Some("apply.extension contains a blank key")
        );
    }

    #[test]
    fn test_deserialize_rule() {
        let rule: Rule = serde_json::from_value(json!({
            "priority": -5,
            "select": {"type": "pentaho/visual/models/heatGrid"},
            "apply": {"props": {"colorSet": {"value": "blue"}}}
        }))
        .unwrap();

        assert_eq!(rule.priority(), -5);
        assert_eq!(
            rule.selector().types(),
            Some(&["pentaho/visual/models/heatGrid".to_string()][..])
        );
        assert_eq!(
            rule.effect().get(Namespace::Props, "colorSet"),
            Some(&StyleValue::from(json!({"value": "blue"})))
        );
    }

    #[test]
    fn test_deserialize_defaults_priority() {
        let rule: Rule = serde_json::from_value(json!({"apply": {}})).unwrap();
        assert_eq!(rule.priority(), 0);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: Result<Rule, _> = serde_json::from_value(json!({"selector": {}}));
        assert!(result.is_err());
    }
}
