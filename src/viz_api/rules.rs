//! The built-in styling rules.

use std::f64::consts::PI;
use std::sync::Arc;

use serde_json::json;

use super::producers::{self, InteractionStyle};
use super::types::*;
use super::{VizApi, FONT, MAX_HORIZONTAL_TEXT_WIDTH};
use crate::color::ColorOps;
use crate::rule::{Rule, Selector};
use crate::value::Deferred;

/// Priority of the global defaults.
pub const DEFAULT_PRIORITY: i32 = -5;

/// Priority of the host-application overrides.
pub const APPLICATION_PRIORITY: i32 = -1;

fn defaults(types: &[&str]) -> Rule {
    Rule::new()
        .with_priority(DEFAULT_PRIORITY)
        .with_select(Selector::of_types(types.iter().copied()))
}

fn in_apps(applications: &[&str], types: &[&str]) -> Rule {
    Rule::new().with_priority(APPLICATION_PRIORITY).with_select(
        Selector::of_types(types.iter().copied()).in_applications(applications.iter().copied()),
    )
}

fn rotated_label_angles() -> serde_json::Value {
    json!([0, 40.0 * (PI / 180.0)])
}

pub(super) fn builtin(api: &VizApi) -> Vec<Rule> {
    let mut rules = models();
    rules.push(ccc_abstract(api));
    rules.extend(cartesian(api));
    rules.extend(metric_dots(api));
    rules.extend(bars(api));
    rules.extend(points(api));
    rules.extend(circular(api));
    rules.push(heat_grid(api));
    rules.push(defaults(&[BOXPLOT]).extension("contentPaddings", json!({"right": 57 + 18})));
    rules.push(sunburst());
    rules.extend(applications());
    rules
}

fn models() -> Vec<Rule> {
    vec![
        defaults(&[MODEL_LINE, MODEL_BAR_LINE]).prop("lineWidth", json!({"value": 2})),
        defaults(&[MODEL_HEAT_GRID]).prop("colorSet", json!({"value": "blue"})),
    ]
}

fn ccc_abstract(api: &VizApi) -> Rule {
    let colors = &api.colors;
    let legend_color = || producers::legend_shape_color(Arc::clone(colors));

    defaults(&[ABSTRACT])
        .extension("margins", 0)
        .extension("paddings", 10)
        .extension("format.number.style", api.formats.style().to_value())
        .extension("multiChartMax", 50)
        .extension("errorMessage_visible", false)
        .extension("noDataMessage_visible", false)
        .extension("invalidDataMessage_visible", false)
        .extension("plotFrameVisible", false)
        // Interaction
        .extension("clickable", true)
        .extension("selectable", true)
        .extension("hoverable", true)
        // Legend
        .extension("legendDrawLine", false)
        .extension("legendDrawMarker", true)
        .extension("legendItemCountMax", 20)
        .extension("legendSizeMax", "30%")
        .extension("legendOverflow", "collapse")
        .extension("legendArea_overflow", "visible")
        .extension("legendPaddings", 0)
        .extension("legendMargins", 0)
        .extension("legendItemSize", json!({"height": 30}))
        .extension(
            "legendItemPadding",
            json!({"left": 7.5, "right": 7.5, "top": 0, "bottom": 0}),
        )
        .extension("legendTextMargin", 6)
        .extension("legendArea_lineWidth", 0)
        .extension("legendArea_strokeStyle", "#c0c0c0")
        .extension("legendDot_ibits", 0)
        .extension("legendDot_imask", "Hoverable")
        .extension(
            "legend.scenes.item.labelText",
            producers::legend_label(f64::from(MAX_HORIZONTAL_TEXT_WIDTH), FONT),
        )
        .extension("legendClickMode", "toggleSelected")
        .extension("color2AxisLegendClickMode", "toggleSelected")
        .extension("color3AxisLegendClickMode", "toggleSelected")
        .extension("legendLabel_textDecoration", json!(null))
        .extension("legendDot_fillStyle", legend_color())
        .extension("legendDot_strokeStyle", legend_color())
        .extension("legend2Dot_fillStyle", legend_color())
        .extension("legend2Dot_strokeStyle", legend_color())
        .extension("tooltipOffset", 20)
        // Title
        .extension("titleVisible", true)
        .extension("titleSize", 30)
        .extension("titlePosition", "top")
        .extension("titleAlign", "center")
        .extension("titleAlignTo", "page-center")
        .extension("titleFont", FONT)
        // Values
        .extension("valuesFont", FONT)
        .extension("valuesVisible", false)
}

fn cartesian(api: &VizApi) -> Vec<Rule> {
    let axes = defaults(&[CARTESIAN_ABSTRACT])
        .extension("margins", 0)
        .extension("paddings", 0)
        .extension("contentMargins", json!({"top": 30, "bottom": 30}))
        .extension("axisSizeMax", "50%")
        // Title
        .extension("axisTitleSizeMax", "20%")
        .extension("axisTitleVisible", true)
        .extension("axisTitleLabel_textMargin", 0)
        .extension("xAxisTitleAlign", "left")
        .extension("yAxisTitleAlign", "top")
        // Labels
        .extension("discreteAxisLabel_ibits", 0)
        .extension("discreteAxisLabel_imask", "ShowsActivity|Hoverable")
        // Grid
        .extension("continuousAxisGrid", true)
        .extension(
            "numericAxisTickFormatter",
            producers::numeric_tick_formatter(Arc::clone(&api.formats)),
        )
        .extension("discreteAxisTickFormatter", producers::discrete_tick_formatter())
        .extension("baseAxisGrid", false)
        .extension("orthoAxisGrid", true)
        .extension("axisGrid_lineWidth", 1)
        .extension("axisGrid_strokeStyle", "#CCC")
        // Rule
        .extension("axisRule_lineWidth", 1)
        .extension("axisRule_strokeStyle", "#999999")
        // Ticks
        .extension("axisTicks", true)
        .extension("axisMinorTicks", false)
        .extension("continuousAxisDesiredTickCount", 5)
        .extension("continuousAxisLabelSpacingMin", 2)
        .extension("axisTicks_lineWidth", 1)
        .extension("axisTicks_strokeStyle", "#999999")
        .extension("axisLabel_textMargin", 10)
        .extension("xAxisTicks_height", 3)
        .extension("yAxisTicks_width", 3);

    let bottom_discrete = defaults(&[
        BAR,
        BAR_STACKED,
        BAR_NORMALIZED,
        POINT_ABSTRACT,
        BAR_LINE,
        WATERFALL,
    ])
    .extension("xAxisPosition", "bottom")
    .extension("xAxisSizeMax", 90)
    .extension("xAxisOverlappedLabelsMode", "rotatethenhide")
    .extension("xAxisLabelRotationDirection", "clockwise")
    .extension("xAxisLabelDesiredAngles", rotated_label_angles());

    let left_continuous = defaults(&[
        BAR,
        BAR_STACKED,
        BAR_NORMALIZED,
        POINT_ABSTRACT,
        BAR_LINE,
        METRIC_DOT_ABSTRACT,
        WATERFALL,
    ])
    .extension("yAxisPosition", "left")
    .extension("yAxisSize", 57)
    .extension("contentPaddings", json!({"right": 57 + 18}));

    vec![
        axes,
        defaults(&[CARTESIAN_ABSTRACT]).extension("panelSizeRatio", 0.8),
        bottom_discrete,
        left_continuous,
    ]
}

fn interaction(style: InteractionStyle, colors: &Arc<dyn ColorOps>) -> Deferred {
    producers::interaction_color(style, Arc::clone(colors))
}

fn metric_dots(api: &VizApi) -> Vec<Rule> {
    vec![
        defaults(&[METRIC_DOT_ABSTRACT])
            .extension("xAxisPosition", "bottom")
            .extension("xAxisSize", 30)
            .extension("baseAxisGrid", true)
            .extension("autoPaddingByDotSize", true)
            .extension("axisOffset", 0)
            .extension("dot_lineWidth", 0)
            .extension(
                "dot_fillStyle",
                interaction(InteractionStyle::METRIC_DOT_FILL, &api.colors),
            ),
        defaults(&[BUBBLE])
            .extension("sizeAxisRatio", 1.0 / 5.0)
            .extension("sizeAxisRatioTo", "height")
            .extension("sizeAxisOriginIsZero", true)
            .extension("dot_shapeSize", producers::bubble_shape_size()),
        defaults(&[SCATTER]).extension("dot_shapeRadius", Deferred::constant(5)),
    ]
}

fn bars(api: &VizApi) -> Vec<Rule> {
    vec![
        defaults(&[
            BAR_HORIZONTAL,
            BAR_STACKED_HORIZONTAL,
            BAR_NORMALIZED_HORIZONTAL,
        ])
        .extension("xAxisPosition", "top")
        .extension("xAxisSize", 30)
        .extension("yAxisPosition", "left")
        .extension("yAxisSizeMax", MAX_HORIZONTAL_TEXT_WIDTH)
        .extension("contentMargins", json!({"right": 30})),
        defaults(&[BAR_ABSTRACT])
            .extension("barSizeRatio", 0.92)
            .extension("barSizeSpacing", 2)
            .extension("barSizeMin", 4)
            .extension("barSizeMax", 150)
            .extension("bar_lineWidth", Deferred::constant(0))
            .extension(
                "bar_fillStyle",
                interaction(InteractionStyle::BAR_FILL, &api.colors),
            ),
    ]
}

fn points(api: &VizApi) -> Vec<Rule> {
    vec![
        defaults(&[POINT_ABSTRACT])
            .extension("axisOffset", 0)
            .extension("tooltipOffset", 15)
            .extension("xAxisGrid", true)
            .extension("xAxisGrid_visible", producers::grid_visible())
            .extension("xAxisGrid_left", producers::grid_left())
            .extension(
                "dot_fillStyle",
                interaction(InteractionStyle::LINE_DOT_FILL, &api.colors),
            )
            .extension(
                "dot_strokeStyle",
                interaction(InteractionStyle::LINE_DOT_STROKE, &api.colors),
            )
            .extension("dot_lineWidth", Deferred::constant(2))
            .extension("linesVisible", false)
            .extension("line_ibits", 0)
            .extension("line_imask", "ShowsActivity"),
        defaults(&[AREA_STACKED]).extension("linesVisible", false),
        defaults(&[MODEL_LINE, MODEL_BAR_LINE]).extension("linesVisible", true),
    ]
}

fn circular(api: &VizApi) -> Vec<Rule> {
    vec![
        defaults(&[PIE])
            .extension("contentPaddings", 0)
            .extension("contentMargins", json!({"top": 30}))
            .extension("legendAlign", "center")
            .extension("legendShape", "circle")
            .extension("activeSliceRadius", 0)
            .extension("titlePosition", "bottom")
            .extension("slice_lineWidth", 0)
            .extension("slice_strokeStyle", "white")
            .extension(
                "slice_fillStyle",
                interaction(InteractionStyle::SLICE_FILL, &api.colors),
            ),
        defaults(&[DONUT])
            .extension("slice_lineWidth", 0)
            .extension("slice_innerRadiusEx", "60%"),
    ]
}

fn heat_grid(api: &VizApi) -> Rule {
    defaults(&[HEAT_GRID])
        .extension("useShapes", true)
        .extension("colorScaleType", "linear")
        .extension("colorNormByCategory", false)
        .extension("axisComposite", false)
        .extension("axisTitleSize", 25)
        .extension("contentPaddings", json!({"right": 80 + 18}))
        .extension("axisRule_lineWidth", 0)
        .extension("orthoAxisGrid", false)
        .extension("baseAxisGrid", false)
        .extension("axisBandSpacing", 5)
        .extension("xAxisPosition", "top")
        .extension("xAxisSizeMax", 80)
        .extension("yAxisSizeMax", 80)
        .extension("xAxisOverlappedLabelsMode", "rotatethenhide")
        .extension("xAxisLabelRotationDirection", "counterclockwise")
        .extension("xAxisLabelDesiredAngles", rotated_label_angles())
        .extension("dot_ibits", 0)
        .extension("dot_imask", "ShowsActivity")
        .extension("dot_lineWidth", 0)
        .extension(
            "dot_fillStyle",
            interaction(InteractionStyle::BAR_FILL, &api.colors),
        )
}

fn sunburst() -> Rule {
    defaults(&[SUNBURST])
        .extension("legendAreaVisible", false)
        .extension("valuesVisible", true)
        .extension("valuesOverflow", "trim")
        .extension("valuesOptimizeLegibility", true)
        .extension("colorMode", "level")
        .extension("slice_strokeStyle", Deferred::constant("white"))
        .extension("slice_lineWidth", Deferred::constant(2))
}

fn applications() -> Vec<Rule> {
    const DET: &str = "pentaho-det";
    const CDF: &str = "pentaho-cdf";
    const ANALYZER: &str = "pentaho-analyzer";

    vec![
        in_apps(&[DET], &[ABSTRACT]).extension("selectable", false),
        in_apps(&[DET, CDF], &[ABSTRACT])
            .extension("legendPosition", "top")
            .extension("legendAlign", "left")
            .extension("legendDot_shape", "circle")
            .extension("legendFont", FONT)
            .extension("legendLabel_textStyle", "#666")
            .extension("legendArea_overflow", "hidden")
            .extension("legendMarkerSize", 8),
        in_apps(&[DET, CDF], &[POINT_ABSTRACT])
            .extension("dotsVisible", false)
            .extension("dot_shapeRadius", Deferred::constant(5)),
        in_apps(&[DET, CDF], &[CARTESIAN_ABSTRACT])
            .extension("axisFont", FONT)
            .extension("axisLabel_textStyle", "#666")
            .extension("axisTitleSize", 18)
            .extension("axisTitleFont", FONT)
            .extension("axisTitleLabel_textStyle", "#666"),
        in_apps(&[CDF], &[BAR_ABSTRACT]).extension("label_textMargin", 7),
        in_apps(&[ANALYZER, DET], &[CARTESIAN_ABSTRACT, HEAT_GRID])
            .extension("xAxisBandSizeMin", 18)
            .extension("yAxisBandSizeMin", 30),
        in_apps(&[ANALYZER, DET], &[HEAT_GRID]).extension("xAxisBandSizeMin", 30),
        in_apps(&[CDF], &[BUBBLE]).extension("sizeAxisUseAbs", false),
    ]
}
