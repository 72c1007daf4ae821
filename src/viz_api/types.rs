//! Chart type ids and their inheritance tree.

use crate::error::HierarchyError;
use crate::hierarchy::TypeRegistry;

pub const MODEL_ABSTRACT: &str = "pentaho/visual/models/abstract";
pub const MODEL_LINE: &str = "pentaho/visual/models/line";
pub const MODEL_BAR_LINE: &str = "pentaho/visual/models/barLine";
pub const MODEL_HEAT_GRID: &str = "pentaho/visual/models/heatGrid";

pub const ABSTRACT: &str = "pentaho/ccc/visual/abstract";
pub const CARTESIAN_ABSTRACT: &str = "pentaho/ccc/visual/cartesianAbstract";
pub const CATEGORICAL_CONTINUOUS_ABSTRACT: &str = "pentaho/ccc/visual/categoricalContinuousAbstract";
pub const BAR_ABSTRACT: &str = "pentaho/ccc/visual/barAbstract";
pub const BAR: &str = "pentaho/ccc/visual/bar";
pub const BAR_STACKED: &str = "pentaho/ccc/visual/barStacked";
pub const BAR_NORMALIZED: &str = "pentaho/ccc/visual/barNormalized";
pub const BAR_HORIZONTAL: &str = "pentaho/ccc/visual/barHorizontal";
pub const BAR_STACKED_HORIZONTAL: &str = "pentaho/ccc/visual/barStackedHorizontal";
pub const BAR_NORMALIZED_HORIZONTAL: &str = "pentaho/ccc/visual/barNormalizedHorizontal";
pub const BAR_LINE: &str = "pentaho/ccc/visual/barLine";
pub const WATERFALL: &str = "pentaho/ccc/visual/waterfall";
pub const POINT_ABSTRACT: &str = "pentaho/ccc/visual/pointAbstract";
pub const LINE: &str = "pentaho/ccc/visual/line";
pub const LINE_STACKED: &str = "pentaho/ccc/visual/lineStacked";
pub const AREA_STACKED: &str = "pentaho/ccc/visual/areaStacked";
pub const BOXPLOT: &str = "pentaho/ccc/visual/boxplot";
pub const METRIC_DOT_ABSTRACT: &str = "pentaho/ccc/visual/metricDotAbstract";
pub const SCATTER: &str = "pentaho/ccc/visual/scatter";
pub const BUBBLE: &str = "pentaho/ccc/visual/bubble";
pub const HEAT_GRID: &str = "pentaho/ccc/visual/heatGrid";
pub const PIE: &str = "pentaho/ccc/visual/pie";
pub const DONUT: &str = "pentaho/ccc/visual/donut";
pub const SUNBURST: &str = "pentaho/ccc/visual/sunburst";

/// `(type, parent)` pairs, parents listed before their children.
const TYPE_TREE: &[(&str, Option<&str>)] = &[
    (MODEL_ABSTRACT, None),
    (MODEL_LINE, Some(MODEL_ABSTRACT)),
    (MODEL_BAR_LINE, Some(MODEL_ABSTRACT)),
    (MODEL_HEAT_GRID, Some(MODEL_ABSTRACT)),
    (ABSTRACT, None),
    (CARTESIAN_ABSTRACT, Some(ABSTRACT)),
    (CATEGORICAL_CONTINUOUS_ABSTRACT, Some(CARTESIAN_ABSTRACT)),
    (BAR_ABSTRACT, Some(CATEGORICAL_CONTINUOUS_ABSTRACT)),
    (BAR, Some(BAR_ABSTRACT)),
    (BAR_STACKED, Some(BAR_ABSTRACT)),
    (BAR_NORMALIZED, Some(BAR_ABSTRACT)),
    (BAR_HORIZONTAL, Some(BAR_ABSTRACT)),
    (BAR_STACKED_HORIZONTAL, Some(BAR_ABSTRACT)),
    (BAR_NORMALIZED_HORIZONTAL, Some(BAR_ABSTRACT)),
    (BAR_LINE, Some(BAR_ABSTRACT)),
    (WATERFALL, Some(BAR_ABSTRACT)),
    (POINT_ABSTRACT, Some(CATEGORICAL_CONTINUOUS_ABSTRACT)),
    (LINE, Some(POINT_ABSTRACT)),
    (LINE_STACKED, Some(POINT_ABSTRACT)),
    (AREA_STACKED, Some(POINT_ABSTRACT)),
    (BOXPLOT, Some(CATEGORICAL_CONTINUOUS_ABSTRACT)),
    (METRIC_DOT_ABSTRACT, Some(CARTESIAN_ABSTRACT)),
    (SCATTER, Some(METRIC_DOT_ABSTRACT)),
    (BUBBLE, Some(METRIC_DOT_ABSTRACT)),
    (HEAT_GRID, Some(CARTESIAN_ABSTRACT)),
    (PIE, Some(ABSTRACT)),
    (DONUT, Some(PIE)),
    (SUNBURST, Some(ABSTRACT)),
];

pub(super) fn registry() -> Result<TypeRegistry, HierarchyError> {
    TYPE_TREE
        .iter()
        .try_fold(TypeRegistry::new(), |registry, (ty, parent)| match parent {
            Some(parent) => registry.register_child(*ty, *parent),
            None => registry.register(*ty),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TypeHierarchy;

    #[test]
    fn test_tree_registers() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), TYPE_TREE.len());
    }

    #[test]
    fn test_ancestry() {
        let registry = registry().unwrap();
        let ancestors: Vec<&str> = registry.ancestors(BAR_HORIZONTAL).collect();
        assert_eq!(
            ancestors,
            vec![BAR_ABSTRACT, CATEGORICAL_CONTINUOUS_ABSTRACT, CARTESIAN_ABSTRACT, ABSTRACT]
        );
        assert!(registry.is_descendant_of(DONUT, PIE));
        assert!(registry.is_descendant_of(BUBBLE, CARTESIAN_ABSTRACT));
        assert!(!registry.is_descendant_of(HEAT_GRID, CATEGORICAL_CONTINUOUS_ABSTRACT));
        assert!(!registry.is_descendant_of(MODEL_LINE, ABSTRACT));
    }
}
