//! The built-in rule table for the charting library.
//!
//! [`VizApi`] produces the default styling rules for every CCC chart type
//! and the viz model types, plus overrides for the `pentaho-det`,
//! `pentaho-cdf` and `pentaho-analyzer` host applications. Producers in the
//! table read a [`MarkScene`] as ambient state and use the injected
//! [`ColorOps`] and [`FormatterCache`].
//!
//! # Example
//!
//! ```rust
//! use vizrule::viz_api::{types, VizApi};
//! use serde_json::json;
//!
//! let api = VizApi::default();
//! let rules = api.rules()?;
//! let resolver = api.resolver()?;
//!
//! let config = resolver.resolve(&rules, types::BAR, ["pentaho-det"], None);
//! assert_eq!(config.extension().literal("selectable"), Some(&json!(false)));
//! assert_eq!(config.extension().literal("barSizeMax"), Some(&json!(150)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod producers;
mod rules;
mod scene;
pub mod types;

use std::sync::Arc;

pub use rules::{APPLICATION_PRIORITY, DEFAULT_PRIORITY};
pub use scene::MarkScene;

use crate::color::{ColorOps, StandardColors};
use crate::error::{HierarchyError, RuleError};
use crate::format::FormatterCache;
use crate::hierarchy::TypeRegistry;
use crate::resolve::Resolver;
use crate::rule::RuleSet;

/// Name of the default color palette.
pub const DEFAULT_PALETTE: &str = "viz_api_all_colors";

/// Font of titles, values, legends and axes.
pub const FONT: &str = "10px OpenSansRegular";

/// Widest a horizontal label may get, in pixels.
pub const MAX_HORIZONTAL_TEXT_WIDTH: u32 = 117;

/// Builds the built-in rule table around injected capabilities.
#[derive(Clone)]
pub struct VizApi {
    colors: Arc<dyn ColorOps>,
    formats: Arc<FormatterCache>,
}

impl VizApi {
    pub fn new(colors: Arc<dyn ColorOps>, formats: Arc<FormatterCache>) -> Self {
        Self { colors, formats }
    }

    pub fn colors(&self) -> &dyn ColorOps {
        self.colors.as_ref()
    }

    pub fn formats(&self) -> &Arc<FormatterCache> {
        &self.formats
    }

    /// The built-in rules, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedRule`] if a rule fails validation.
    pub fn rules(&self) -> Result<RuleSet, RuleError> {
        let rules = RuleSet::new(rules::builtin(self))?;
        tracing::debug!(rules = rules.len(), "built viz api rule table");
        Ok(rules)
    }

    /// The model and CCC chart types with their inheritance.
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if the type tree is inconsistent.
    pub fn hierarchy() -> Result<TypeRegistry, HierarchyError> {
        types::registry()
    }

    /// A resolver over [`hierarchy`](Self::hierarchy).
    ///
    /// # Errors
    ///
    /// Returns a [`HierarchyError`] if the type tree is inconsistent.
    pub fn resolver(&self) -> Result<Resolver, HierarchyError> {
        Ok(Resolver::new(Self::hierarchy()?))
    }
}

impl Default for VizApi {
    /// [`StandardColors`] and the process-wide [`FormatterCache`].
    fn default() -> Self {
        Self::new(Arc::new(StandardColors), FormatterCache::global())
    }
}

impl std::fmt::Debug for VizApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VizApi")
            .field("formats", &self.formats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Ambient;
    use crate::rule::Namespace;
    use serde_json::json;

    fn resolve(ty: &str, tags: &[&str]) -> crate::ResolvedConfig {
        let api = VizApi::default();
        let rules = api.rules().unwrap();
        api.resolver()
            .unwrap()
            .resolve(&rules, ty, tags.iter().copied(), None)
    }

    #[test]
    fn test_rule_table_validates() {
        let rules = VizApi::default().rules().unwrap();
        assert_eq!(rules.len(), 28);
        assert!(rules
            .iter()
            .all(|rule| [DEFAULT_PRIORITY, APPLICATION_PRIORITY].contains(&rule.priority())));
    }

    #[test]
    fn test_cartesian_overrides_abstract() {
        let bar = resolve(types::BAR, &[]);
        assert_eq!(bar.extension().literal("paddings"), Some(&json!(0)));
        assert_eq!(bar.extension().literal("titleFont"), Some(&json!(FONT)));

        let pie = resolve(types::PIE, &[]);
        assert_eq!(pie.extension().literal("paddings"), Some(&json!(10)));
        assert_eq!(pie.extension().literal("titlePosition"), Some(&json!("bottom")));
    }

    #[test]
    fn test_models_set_props() {
        let line = resolve(types::MODEL_LINE, &[]);
        assert_eq!(
            line.value(Namespace::Props, "lineWidth"),
            Some(Ok(json!({"value": 2})))
        );
        assert_eq!(line.extension().literal("linesVisible"), Some(&json!(true)));

        let heat = resolve(types::MODEL_HEAT_GRID, &[]);
        assert_eq!(heat.prop_value("colorSet"), Some(Ok(json!({"value": "blue"}))));
    }

    #[test]
    fn test_application_overrides() {
        let cdf = resolve(types::BAR_STACKED, &["pentaho-cdf"]);
        assert_eq!(cdf.extension().literal("label_textMargin"), Some(&json!(7)));
        assert_eq!(cdf.extension().literal("legendArea_overflow"), Some(&json!("hidden")));
        assert_eq!(cdf.extension().literal("selectable"), Some(&json!(true)));

        let analyzer = resolve(types::HEAT_GRID, &["pentaho-analyzer"]);
        assert_eq!(analyzer.extension().literal("xAxisBandSizeMin"), Some(&json!(30)));
        assert_eq!(analyzer.extension().literal("yAxisBandSizeMin"), Some(&json!(30)));
    }

    #[test]
    fn test_scene_driven_values() {
        let scatter = resolve(types::SCATTER, &[]);
        let scene = MarkScene::new().with_color("#ff0000").interactive(false, false);
        let ambient: &Ambient = &scene;

        assert_eq!(
            scatter.evaluate_with(Namespace::Extension, "dot_fillStyle", ambient, &[]),
            Some(Ok(json!("rgba(255,0,0,0.5)")))
        );
        assert_eq!(
            scatter.evaluate_with(Namespace::Extension, "dot_shapeRadius", ambient, &[]),
            Some(Ok(json!(5)))
        );
    }

    #[test]
    fn test_number_style_is_exposed() {
        let config = resolve(types::SUNBURST, &[]);
        let style = config.extension().literal("format.number.style").unwrap();
        assert_eq!(style["group"], json!(" "));
    }
}
