//! Rule selectors: which targets and applications a rule applies to.

use serde::{Deserialize, Deserializer};

use crate::hierarchy::TypeHierarchy;
use crate::resolve::EvaluationContext;

/// Predicate over the target type and the active application tags.
///
/// Both criteria are optional. An absent criterion does not constrain, so a
/// selector with neither matches everything.
///
/// In declarative data each criterion may be a single string or a list:
///
/// ```rust
/// use vizrule::Selector;
///
/// let selector: Selector = serde_json::from_value(serde_json::json!({
///     "application": "pentaho-cdf",
///     "type": ["pentaho/ccc/visual/bubble"]
/// })).unwrap();
///
/// assert_eq!(selector.types(), Some(&["pentaho/ccc/visual/bubble".to_string()][..]));
/// assert_eq!(selector.applications(), Some(&["pentaho-cdf".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Selector {
    #[serde(rename = "type", default, deserialize_with = "one_or_many")]
    types: Option<Vec<String>>,
    #[serde(rename = "application", default, deserialize_with = "one_or_many")]
    applications: Option<Vec<String>>,
}

impl Selector {
    /// A selector without criteria; it matches every context.
    pub fn any() -> Self {
        Self::default()
    }

    /// Selects targets of type `ty` or any of its descendants.
    pub fn of_type(ty: impl Into<String>) -> Self {
        Self::any().or_type(ty)
    }

    /// Selects targets of any of the given types or their descendants.
    pub fn of_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        types.into_iter().fold(Self::any(), |sel, ty| sel.or_type(ty))
    }

    /// Adds another accepted type.
    pub fn or_type(mut self, ty: impl Into<String>) -> Self {
        self.types.get_or_insert_with(Vec::new).push(ty.into());
        self
    }

    /// Restricts the selector to contexts declaring `tag`, or any tag added
    /// through further calls.
    pub fn in_application(mut self, tag: impl Into<String>) -> Self {
        self.applications
            .get_or_insert_with(Vec::new)
            .push(tag.into());
        self
    }

    /// Restricts the selector to contexts declaring any of `tags`.
    pub fn in_applications<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter()
            .fold(self, |sel, tag| sel.in_application(tag))
    }

    pub fn types(&self) -> Option<&[String]> {
        self.types.as_deref()
    }

    pub fn applications(&self) -> Option<&[String]> {
        self.applications.as_deref()
    }

    /// Returns `true` if the selector has no criteria.
    pub fn is_universal(&self) -> bool {
        self.types.is_none() && self.applications.is_none()
    }

    /// Returns `true` if every present criterion matches `context`.
    pub fn matches(&self, context: &EvaluationContext, hierarchy: &dyn TypeHierarchy) -> bool {
        self.matches_type(context.target(), hierarchy) && self.matches_application(context)
    }

    fn matches_type(&self, target: &str, hierarchy: &dyn TypeHierarchy) -> bool {
        let Some(types) = &self.types else {
            return true;
        };
        if !hierarchy.is_known(target) {
            tracing::debug!(target_type = target, "unknown target type matches no typed rule");
            return false;
        }
        types
            .iter()
            .any(|ty| ty == target || hierarchy.is_descendant_of(target, ty))
    }

    fn matches_application(&self, context: &EvaluationContext) -> bool {
        match &self.applications {
            None => true,
            Some(tags) => tags.iter().any(|tag| context.has_application(tag)),
        }
    }

    /// Describes why the selector can never be used, if it can't.
    pub(crate) fn problem(&self) -> Option<String> {
        for (field, values) in [("type", &self.types), ("application", &self.applications)] {
            if let Some(values) = values {
                if values.is_empty() {
                    return Some(format!("select.{field} is present but empty"));
                }
                if values.iter().any(|v| v.trim().is_empty()) {
                    return Some(format!("select.{field} contains a blank identifier"));
                }
            }
        }
        None
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(list) => list,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{FlatHierarchy, TypeRegistry};
    use serde_json::json;

    fn context(ty: &str, tags: &[&str]) -> EvaluationContext {
        EvaluationContext::new(ty).with_applications(tags.iter().copied())
    }

    #[test]
    fn test_universal_selector_matches_everything() {
        let selector = Selector::any();
        assert!(selector.is_universal());
        assert!(selector.matches(&context("A", &[]), &FlatHierarchy));
        assert!(selector.matches(&context("B", &["x", "y"]), &FlatHierarchy));
    }

    #[test]
    fn test_absent_application_matches_any_tags() {
        let selector = Selector::of_type("A");
        assert!(selector.matches(&context("A", &[]), &FlatHierarchy));
        assert!(selector.matches(&context("A", &["pentaho-det"]), &FlatHierarchy));
    }

    #[test]
    fn test_application_requires_intersection() {
        let selector = Selector::any().in_application("A");
        assert!(!selector.matches(&context("T", &["B"]), &FlatHierarchy));
        assert!(!selector.matches(&context("T", &[]), &FlatHierarchy));
        assert!(selector.matches(&context("T", &["B", "A"]), &FlatHierarchy));
    }

    #[test]
    fn test_application_list_is_or() {
        let selector = Selector::any().in_applications(["pentaho-det", "pentaho-cdf"]);
        assert!(selector.matches(&context("T", &["pentaho-cdf"]), &FlatHierarchy));
        assert!(selector.matches(&context("T", &["pentaho-det"]), &FlatHierarchy));
        assert!(!selector.matches(&context("T", &["pentaho-analyzer"]), &FlatHierarchy));
    }

    #[test]
    fn test_type_list_matches_any_entry() {
        let selector = Selector::of_types(["line", "barLine"]);
        assert!(selector.matches(&context("barLine", &[]), &FlatHierarchy));
        assert!(!selector.matches(&context("pie", &[]), &FlatHierarchy));
    }

    #[test]
    fn test_type_matches_descendants() {
        let registry = TypeRegistry::new()
            .register("abstract")
            .and_then(|r| r.register_child("cartesian", "abstract"))
            .and_then(|r| r.register_child("bar", "cartesian"))
            .unwrap();

        let selector = Selector::of_type("abstract");
        assert!(selector.matches(&context("bar", &[]), &registry));
        assert!(!Selector::of_type("bar").matches(&context("cartesian", &[]), &registry));
    }

    #[test]
    fn test_unknown_type_matches_nothing_typed() {
        let registry = TypeRegistry::new().register("abstract").unwrap();
        assert!(!Selector::of_type("ghost").matches(&context("ghost", &[]), &registry));
        assert!(Selector::any().matches(&context("ghost", &[]), &registry));
    }

    #[test]
    fn test_both_criteria_must_match() {
        let selector = Selector::of_type("A").in_application("det");
        assert!(selector.matches(&context("A", &["det"]), &FlatHierarchy));
        assert!(!selector.matches(&context("B", &["det"]), &FlatHierarchy));
        assert!(!selector.matches(&context("A", &["cdf"]), &FlatHierarchy));
    }

    #[test]
    fn test_deserialize_single_or_list() {
        let single: Selector = serde_json::from_value(json!({"type": "A"})).unwrap();
        assert_eq!(single, Selector::of_type("A"));

        let list: Selector =
            serde_json::from_value(json!({"application": ["x", "y"]})).unwrap();
        assert_eq!(list, Selector::any().in_applications(["x", "y"]));

        let empty: Selector = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_universal());
    }

    #[test]
    fn test_deserialize_rejects_unknown_criteria() {
        let result = serde_json::from_value::<Selector>(json!({"typ": "A"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_problem_detection() {
        assert!(Selector::any().problem().is_none());
        assert!(Selector::of_type(" ").problem().is_some());

        let empty: Selector = serde_json::from_value(json!({"type": []})).unwrap();
        assert_eq!(
            empty.problem().as_deref(),
            Some("select.type is present but empty")
        );
    }
}
