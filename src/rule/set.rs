//! Validated, immutable rule collections.

use std::sync::Arc;

use super::Rule;
use crate::error::RuleError;
use crate::value::Value;

/// An ordered, validated collection of rules.
///
/// Declaration order is kept and breaks priority ties. The set is immutable
/// once built and cheap to clone, so one instance can back any number of
/// concurrent resolution calls.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Arc<[Rule]>,
}

impl RuleSet {
    /// Validates `rules` and builds a set.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedRule`] for the first rule with an empty or
    /// blank selector criterion or a blank applied key. The whole set is
    /// rejected.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        for (index, rule) in rules.iter().enumerate() {
            if let Some(reason) = rule.problem() {
                return Err(RuleError::MalformedRule { index, reason });
            }
        }
        Ok(Self {
            rules: rules.into(),
        })
    }

    /// Builds a literal-only set from declarative data: a JSON array of
    /// `{priority, select, apply}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedRule`] if the value is not an array, if an
    /// element does not have the rule shape, or if validation fails.
    pub fn from_value(value: Value) -> Result<Self, RuleError> {
        let Value::Array(items) = value else {
            return Err(RuleError::MalformedRule {
                index: 0,
                reason: "rule set must be an array".to_string(),
            });
        };
        let rules = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Rule>(item).map_err(|err| RuleError::MalformedRule {
                    index,
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    /// Concatenates several sets, earlier sets first.
    ///
    /// This is how global defaults and per-application overrides are combined
    /// before a single resolution: at equal priority, rules from later sets
    /// win.
    pub fn merged<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = RuleSet>,
    {
        let rules: Vec<Rule> = sets
            .into_iter()
            .flat_map(|set| set.rules.to_vec())
            .collect();
        Self {
            rules: rules.into(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
