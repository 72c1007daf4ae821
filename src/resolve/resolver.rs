//! The rule resolver: filter, order, fold.

use std::sync::Arc;

use super::chain::Ambient;
use super::config::ResolvedConfig;
use super::context::EvaluationContext;
use crate::hierarchy::{FlatHierarchy, TypeHierarchy};
use crate::rule::{Rule, RuleSet};

/// Resolves rule sets into merged configurations.
///
/// The resolver owns the type-hierarchy capability and nothing else, so one
/// instance can serve any number of rule sets and threads.
///
/// # Resolution
///
/// 1. Keep the rules whose selector matches the context
/// 2. Stable-sort them by ascending priority; ties keep declaration order
/// 3. Fold them lowest first: literals replace, deferred values wrap
///
/// # Example
///
/// ```rust
/// use vizrule::{Resolver, Rule, RuleSet, Selector};
/// use serde_json::json;
///
/// let rules = RuleSet::new(vec![
///     Rule::new().with_priority(-1).with_select(Selector::of_type("A")).extension("x", 2),
///     Rule::new().with_priority(-5).with_select(Selector::of_type("A")).extension("x", 1),
/// ])
/// .unwrap();
///
/// let resolver = Resolver::default();
/// let config = resolver.resolve(&rules, "A", None::<&str>, None);
/// assert_eq!(config.extension().literal("x"), Some(&json!(2)));
///
/// let config = resolver.resolve(&rules, "B", None::<&str>, None);
/// assert!(config.is_empty());
/// ```
#[derive(Clone)]
pub struct Resolver {
    hierarchy: Arc<dyn TypeHierarchy>,
}

impl Resolver {
    /// Creates a resolver that looks up ancestry in `hierarchy`.
    pub fn new<H: TypeHierarchy + 'static>(hierarchy: H) -> Self {
        Self {
            hierarchy: Arc::new(hierarchy),
        }
    }

    /// Creates a resolver sharing an existing hierarchy.
    pub fn with_shared(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &dyn TypeHierarchy {
        self.hierarchy.as_ref()
    }

    /// Resolves `rules` for one chart instance.
    ///
    /// `application_tags` are the hosting contexts that are active and
    /// `ambient` is the renderer state deferred producers may read.
    pub fn resolve<I, S>(
        &self,
        rules: &RuleSet,
        target_type: &str,
        application_tags: I,
        ambient: Option<Arc<Ambient>>,
    ) -> ResolvedConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut context = EvaluationContext::new(target_type).with_applications(application_tags);
        if let Some(ambient) = ambient {
            context = context.with_shared_ambient(ambient);
        }
        self.resolve_context(rules, &context)
    }

    /// Resolves `rules` for a prepared context.
    pub fn resolve_context(&self, rules: &RuleSet, context: &EvaluationContext) -> ResolvedConfig {
        let matched = self.matching(rules, context);
        let mut config = ResolvedConfig::new(context.ambient().cloned());

        for (index, rule) in &matched {
            tracing::trace!(
                rule = *index,
                priority = rule.priority(),
                keys = rule.effect().len(),
                "applying rule"
            );
            config.apply(rule.effect());
        }

        tracing::debug!(
            target_type = context.target(),
            applications = context.applications().count(),
            rules = rules.len(),
            matched = matched.len(),
            props = config.props().len(),
            extension = config.extension().len(),
            "resolved configuration"
        );
        config
    }

    /// The rules that match `context`, in application order, paired with
    /// their declaration index.
    pub fn matching<'r>(
        &self,
        rules: &'r RuleSet,
        context: &EvaluationContext,
    ) -> Vec<(usize, &'r Rule)> {
        let mut matched: Vec<(usize, &Rule)> = rules
            .iter()
            .enumerate()
            .filter(|(index, rule)| {
                let hit = rule.selector().matches(context, self.hierarchy());
                if !hit {
                    tracing::trace!(rule = *index, "selector rejected rule");
                }
                hit
            })
            .collect();
        // sort_by_key is stable: equal priorities keep declaration order.
        matched.sort_by_key(|(_, rule)| rule.priority());
        matched
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(FlatHierarchy)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
