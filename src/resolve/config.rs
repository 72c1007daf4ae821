//! The merged output of a resolution call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Map;

use super::chain::{Ambient, Entry};
use crate::error::ChainError;
use crate::rule::{Apply, Namespace};
use crate::value::{StyleValue, Value};

/// One namespace of a resolved configuration.
///
/// Keys are kept sorted so iteration order never depends on rule order.
#[derive(Clone, Default, PartialEq)]
pub struct Section {
    entries: BTreeMap<String, Entry>,
}

impl Section {
    /// Folds one rule value into the section.
    ///
    /// Literals replace the current entry. Deferred values wrap it, so the
    /// current entry becomes their predecessor.
    pub(crate) fn apply(&mut self, key: &str, value: &StyleValue) {
        let entry = match value {
            StyleValue::Literal(literal) => Entry::Literal(literal.clone()),
            StyleValue::Deferred(producer) => {
                let predecessor = self.entries.remove(key);
                Entry::wrap(producer.clone(), predecessor)
            }
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// The effective entry for `key`.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// The literal value for `key`, if it resolved to one.
    pub fn literal(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(Entry::as_literal)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluates `key`, or returns `None` if no rule set it.
    pub fn evaluate(
        &self,
        key: &str,
        ambient: Option<&Ambient>,
        args: &[Value],
    ) -> Option<Result<Value, ChainError>> {
        self.entries
            .get(key)
            .map(|entry| entry.evaluate(key, ambient, args))
    }

    /// Evaluates every key without arguments.
    ///
    /// A failing key only affects its own slot in the result.
    pub fn settle(&self, ambient: Option<&Ambient>) -> BTreeMap<String, Result<Value, ChainError>> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.evaluate(key, ambient, &[])))
            .collect()
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// The flattened result of folding every matching rule in priority order.
///
/// Holds the ambient state of the context it was resolved for, so entries can
/// be evaluated directly with [`value`](Self::value). Renderers that evaluate
/// per mark pass their own state to [`evaluate_with`](Self::evaluate_with).
#[derive(Clone, Default)]
pub struct ResolvedConfig {
    props: Section,
    extension: Section,
    ambient: Option<Arc<Ambient>>,
}

impl ResolvedConfig {
    pub(crate) fn new(ambient: Option<Arc<Ambient>>) -> Self {
        Self {
            props: Section::default(),
            extension: Section::default(),
            ambient,
        }
    }

    pub(crate) fn apply(&mut self, apply: &Apply) {
        for (key, value) in apply.props() {
            self.props.apply(key, value);
        }
        for (key, value) in apply.extension() {
            self.extension.apply(key, value);
        }
    }

    /// Model property values.
    pub fn props(&self) -> &Section {
        &self.props
    }

    /// Renderer extension values.
    pub fn extension(&self) -> &Section {
        &self.extension
    }

    pub fn section(&self, namespace: Namespace) -> &Section {
        match namespace {
            Namespace::Props => &self.props,
            Namespace::Extension => &self.extension,
        }
    }

    /// The ambient state captured at resolution time.
    pub fn ambient(&self) -> Option<&Ambient> {
        self.ambient.as_deref()
    }

    /// Returns `true` if no matching rule set any key.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.extension.is_empty()
    }

    /// Evaluates `key` with the captured ambient state and no arguments.
    pub fn value(&self, namespace: Namespace, key: &str) -> Option<Result<Value, ChainError>> {
        self.section(namespace).evaluate(key, self.ambient(), &[])
    }

    /// Shorthand for `value(Namespace::Extension, key)`.
    pub fn extension_value(&self, key: &str) -> Option<Result<Value, ChainError>> {
        self.value(Namespace::Extension, key)
    }

    /// Shorthand for `value(Namespace::Props, key)`.
    pub fn prop_value(&self, key: &str) -> Option<Result<Value, ChainError>> {
        self.value(Namespace::Props, key)
    }

    /// Evaluates `key` against a caller-supplied ambient state and arguments.
    pub fn evaluate_with(
        &self,
        namespace: Namespace,
        key: &str,
        ambient: &Ambient,
        args: &[Value],
    ) -> Option<Result<Value, ChainError>> {
        self.section(namespace).evaluate(key, Some(ambient), args)
    }

    /// Evaluates every key into a JSON object `{"props": .., "extension": ..}`.
    ///
    /// Keys whose chain fails are left out and logged.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for namespace in [Namespace::Props, Namespace::Extension] {
            let mut section = Map::new();
            for (key, result) in self.section(namespace).settle(self.ambient()) {
                match result {
                    Ok(value) => {
                        section.insert(key, value);
                    }
                    Err(err) => {
                        tracing::warn!(
                            namespace = namespace.as_str(),
                            key = %key,
                            error = %err,
                            "skipping key that failed to evaluate"
                        );
                    }
                }
            }
            root.insert(namespace.as_str().to_string(), Value::Object(section));
        }
        Value::Object(root)
    }
}

/// Equality compares entries only; the captured ambient state is ignored.
impl PartialEq for ResolvedConfig {
    fn eq(&self, other: &Self) -> bool {
        self.props == other.props && self.extension == other.extension
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("props", &self.props)
            .field("extension", &self.extension)
            .field("ambient", &self.ambient.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Deferred;
    use serde_json::json;

    fn increment() -> StyleValue {
        StyleValue::from(Deferred::new(|inv| {
            let base = inv.delegate()?.as_i64().unwrap_or(0);
            Ok(inv.finished(base + 1))
        }))
    }

    #[test]
    fn test_literal_replaces_chain() {
        let mut section = Section::default();
        section.apply("width", &increment());
        section.apply("width", &StyleValue::from(7));

        assert_eq!(section.literal("width"), Some(&json!(7)));
        assert_eq!(section.get("width").map(Entry::depth), Some(0));
    }

    #[test]
    fn test_deferred_wraps_literal() {
        let mut section = Section::default();
        section.apply("width", &StyleValue::from(1));
        section.apply("width", &increment());
        section.apply("width", &increment());

        assert!(section.literal("width").is_none());
        assert_eq!(section.evaluate("width", None, &[]), Some(Ok(json!(3))));
    }

    #[test]
    fn test_missing_key_evaluates_to_none() {
        let section = Section::default();
        assert!(section.evaluate("nope", None, &[]).is_none());
    }

    #[test]
    fn test_settle_isolates_failures() {
        let mut section = Section::default();
        section.apply("broken", &increment());
        section.apply("fine", &StyleValue::from("ok"));

        let settled = section.settle(None);
        assert!(settled["broken"].as_ref().unwrap_err().is_no_predecessor());
        assert_eq!(settled["fine"], Ok(json!("ok")));
    }

    #[test]
    fn test_to_json_skips_failed_keys() {
        let mut config = ResolvedConfig::default();
        config.props.apply("lineWidth", &StyleValue::from(json!({"value": 2})));
        config.extension.apply("broken", &increment());
        config.extension.apply("margins", &StyleValue::from(0));

        assert_eq!(
            config.to_json(),
            json!({
                "props": {"lineWidth": {"value": 2}},
                "extension": {"margins": 0}
            })
        );
    }

    #[test]
    fn test_value_uses_captured_ambient() {
        let ambient: Arc<Ambient> = Arc::new(10_i64);
        let mut config = ResolvedConfig::new(Some(ambient));
        config.extension.apply(
            "size",
            &StyleValue::from(Deferred::new(|inv| {
                let n = *inv.require_ambient::<i64>()?;
                Ok(inv.finished(n * 2))
            })),
        );

        assert_eq!(config.extension_value("size"), Some(Ok(json!(20))));
        assert_eq!(
            config.evaluate_with(Namespace::Extension, "size", &4_i64, &[]),
            Some(Ok(json!(8)))
        );
    }
}
