//! Deferred producers of the built-in rule table.
//!
//! All producers that need renderer state read it as a [`MarkScene`]; a
//! different ambient type is reported as a producer error for that key.

use std::sync::Arc;

use super::scene::MarkScene;
use crate::color::ColorOps;
use crate::format::FormatterCache;
use crate::text;
use crate::value::{Deferred, Value};

const LABEL_ELLIPSIS: &str = "..";

/// Which scene flag turns an unselected mark into the "active" gray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ActiveWhen {
    MayShowActive,
    IsActive,
}

/// What happens to the base color of a selected or unselected-idle mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Emphasis {
    Keep,
    Alpha(f64),
    Named(&'static str),
}

impl Emphasis {
    fn apply(self, colors: &dyn ColorOps, base: Value) -> Value {
        match self {
            Emphasis::Keep => base,
            Emphasis::Alpha(alpha) => colors.with_alpha(&base, alpha),
            Emphasis::Named(name) => colors.named(name).unwrap_or(base),
        }
    }
}

/// Color treatment of one mark kind under selection and hover.
///
/// A mark that is not among the selected ones is grayed out, or drawn in a
/// dark translucent gray while active. Otherwise an active mark gets
/// `active` and the rest get `idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct InteractionStyle {
    unselected_active: ActiveWhen,
    active: Emphasis,
    idle: Emphasis,
}

impl InteractionStyle {
    pub(crate) const METRIC_DOT_FILL: Self = Self {
        unselected_active: ActiveWhen::MayShowActive,
        active: Emphasis::Keep,
        idle: Emphasis::Alpha(0.5),
    };

    /// Bars and heat grid cells.
    pub(crate) const BAR_FILL: Self = Self {
        unselected_active: ActiveWhen::IsActive,
        active: Emphasis::Alpha(0.5),
        idle: Emphasis::Keep,
    };

    pub(crate) const LINE_DOT_FILL: Self = Self {
        unselected_active: ActiveWhen::MayShowActive,
        active: Emphasis::Named("white"),
        idle: Emphasis::Keep,
    };

    pub(crate) const LINE_DOT_STROKE: Self = Self {
        unselected_active: ActiveWhen::MayShowActive,
        active: Emphasis::Keep,
        idle: Emphasis::Keep,
    };

    pub(crate) const SLICE_FILL: Self = Self {
        unselected_active: ActiveWhen::IsActive,
        active: Emphasis::Alpha(0.85),
        idle: Emphasis::Keep,
    };

    fn apply(&self, colors: &dyn ColorOps, scene: &MarkScene, base: Value) -> Value {
        if !scene.shows_interaction {
            return base;
        }
        if scene.not_among_selected {
            let active = match self.unselected_active {
                ActiveWhen::MayShowActive => scene.may_show_active,
                ActiveWhen::IsActive => scene.is_active,
            };
            if active {
                active_unselected(colors).unwrap_or(base)
            } else {
                colors.to_gray_scale(&base, Some(-0.3))
            }
        } else if scene.may_show_active {
            self.active.apply(colors, base)
        } else {
            self.idle.apply(colors, base)
        }
    }
}

fn active_unselected(colors: &dyn ColorOps) -> Option<Value> {
    let gray = colors.named("darkgray")?;
    Some(colors.with_alpha(&colors.darker(&gray, 2.0), 0.8))
}

/// Restyles the lower-priority color (or the scene color when nothing lower
/// is set) according to `style`.
pub(crate) fn interaction_color(style: InteractionStyle, colors: Arc<dyn ColorOps>) -> Deferred {
    Deferred::new(move |inv| {
        let scene = inv.require_ambient::<MarkScene>()?;
        let base = inv.delegate_or_else(|| scene.color.clone().unwrap_or(Value::Null))?;
        Ok(inv.finished(style.apply(colors.as_ref(), scene, base)))
    })
}

/// Legend markers: the series color, grayed out when the series is off.
pub(crate) fn legend_shape_color(colors: Arc<dyn ColorOps>) -> Deferred {
    Deferred::new(move |inv| {
        let scene = inv.require_ambient::<MarkScene>()?;
        let color = match &scene.color {
            Some(color) => color.clone(),
            None => inv.delegate()?,
        };
        if scene.is_on {
            Ok(inv.finished(color))
        } else {
            Ok(inv.finished(colors.to_gray_scale(&color, None)))
        }
    })
}

/// Legend labels trimmed to `max_width` pixels.
pub(crate) fn legend_label(max_width: f64, default_font: &'static str) -> Deferred {
    Deferred::new(move |inv| {
        let label = match inv.delegate()? {
            Value::String(label) => label,
            other => return Ok(inv.finished(other)),
        };
        let font = inv
            .ambient::<MarkScene>()
            .and_then(|scene| scene.font.as_deref())
            .unwrap_or(default_font);
        Ok(inv.finished(text::trim_to_pixel_width(
            max_width,
            &label,
            font,
            LABEL_ELLIPSIS,
        )))
    })
}

/// Continuous axis ticks. Arguments: `(value, precision, base)`.
pub(crate) fn numeric_tick_formatter(formats: Arc<FormatterCache>) -> Deferred {
    Deferred::new(move |inv| {
        let value = inv
            .arg(0)
            .and_then(Value::as_f64)
            .ok_or_else(|| inv.fail("tick value is not a number"))?;
        let precision = inv
            .arg(1)
            .and_then(Value::as_u64)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(0);
        let base = inv.arg(2).and_then(Value::as_f64).unwrap_or(0.0);
        Ok(inv.finished(formats.number_formatter(precision, base).format(value)))
    })
}

/// Discrete axis ticks. Arguments: `(value, label)`.
///
/// With more than two arguments the axis is formatting dates, which are
/// shown as the raw value.
pub(crate) fn discrete_tick_formatter() -> Deferred {
    Deferred::new(|inv| match inv.args() {
        [value, _, _, ..] => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(inv.finished(text))
        }
        args => Ok(inv.finished(args.get(1).cloned().unwrap_or(Value::Null))),
    })
}

/// Bubble size: fixed at 25 unless a field drives the size role.
pub(crate) fn bubble_shape_size() -> Deferred {
    Deferred::new(|inv| {
        let scene = inv.require_ambient::<MarkScene>()?;
        if scene.size_role_bound {
            inv.delegate().map(|size| inv.finished(size))
        } else {
            Ok(inv.finished(25))
        }
    })
}

/// Grid lines on a discrete base axis sit between bands, so the first one
/// is hidden.
pub(crate) fn grid_visible() -> Deferred {
    Deferred::new(|inv| {
        let scene = inv.require_ambient::<MarkScene>()?;
        if scene.base_axis_discrete {
            Ok(inv.finished(scene.index > 0))
        } else {
            inv.delegate().map(|visible| inv.finished(visible))
        }
    })
}

/// Shifts grid lines on a discrete base axis half a band to the left.
pub(crate) fn grid_left() -> Deferred {
    Deferred::new(|inv| {
        let scene = inv.require_ambient::<MarkScene>()?;
        let left = inv.delegate()?;
        if !scene.base_axis_discrete {
            return Ok(inv.finished(left));
        }
        let left = left
            .as_f64()
            .ok_or_else(|| inv.fail("grid position is not a number"))?;
        Ok(inv.finished(left - scene.band_step / 2.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StandardColors;
    use crate::error::ChainError;
    use crate::resolve::{Ambient, Entry};
    use serde_json::json;

    const BLUE: &str = "#0000ff";
    const ACTIVE_GRAY: &str = "rgba(82,82,82,0.8)";

    fn colors() -> Arc<dyn ColorOps> {
        Arc::new(StandardColors)
    }

    fn run(
        producer: Deferred,
        lower: Option<Value>,
        scene: &MarkScene,
        args: &[Value],
    ) -> Result<Value, ChainError> {
        let entry = Entry::wrap(producer, lower.map(Entry::Literal));
        entry.evaluate("key", Some(scene as &Ambient), args)
    }

    fn fill(style: InteractionStyle, scene: &MarkScene) -> Value {
        run(interaction_color(style, colors()), Some(json!(BLUE)), scene, &[]).unwrap()
    }

    #[test]
    fn test_no_interaction_keeps_color() {
        let scene = MarkScene::new();
        assert_eq!(fill(InteractionStyle::BAR_FILL, &scene), json!(BLUE));
    }

    #[test]
    fn test_unselected_is_grayed() {
        let scene = MarkScene::new().interactive(true, false);
        let gray = fill(InteractionStyle::BAR_FILL, &scene);
        assert_eq!(gray, json!("rgba(49,49,49,0.3)"));
    }

    #[test]
    fn test_unselected_active_is_dark_gray() {
        let scene = MarkScene::new().interactive(true, true);
        for style in [
            InteractionStyle::BAR_FILL,
            InteractionStyle::METRIC_DOT_FILL,
            InteractionStyle::LINE_DOT_FILL,
            InteractionStyle::LINE_DOT_STROKE,
            InteractionStyle::SLICE_FILL,
        ] {
            assert_eq!(fill(style, &scene), json!(ACTIVE_GRAY));
        }
    }

    #[test]
    fn test_active_test_differs_by_mark() {
        // Hover is possible but the mark is not the active one.
        let mut scene = MarkScene::new().interactive(true, true);
        scene.is_active = false;
        assert_eq!(fill(InteractionStyle::METRIC_DOT_FILL, &scene), json!(ACTIVE_GRAY));
        assert_eq!(
            fill(InteractionStyle::BAR_FILL, &scene),
            json!("rgba(49,49,49,0.3)")
        );
    }

    #[test]
    fn test_selected_active_emphasis() {
        let scene = MarkScene::new().interactive(false, true);
        assert_eq!(
            fill(InteractionStyle::BAR_FILL, &scene),
            json!("rgba(0,0,255,0.5)")
        );
        assert_eq!(
            fill(InteractionStyle::SLICE_FILL, &scene),
            json!("rgba(0,0,255,0.85)")
        );
        assert_eq!(fill(InteractionStyle::LINE_DOT_FILL, &scene), json!("#ffffff"));
        assert_eq!(fill(InteractionStyle::METRIC_DOT_FILL, &scene), json!(BLUE));
    }

    #[test]
    fn test_idle_metric_dots_fade() {
        let scene = MarkScene::new().interactive(false, false);
        assert_eq!(
            fill(InteractionStyle::METRIC_DOT_FILL, &scene),
            json!("rgba(0,0,255,0.5)")
        );
        assert_eq!(fill(InteractionStyle::BAR_FILL, &scene), json!(BLUE));
    }

    #[test]
    fn test_scene_color_without_predecessor() {
        let scene = MarkScene::new().with_color("red");
        let value = run(
            interaction_color(InteractionStyle::BAR_FILL, colors()),
            None,
            &scene,
            &[],
        );
        assert_eq!(value, Ok(json!("red")));
    }

    #[test]
    fn test_wrong_ambient_type() {
        let entry = Entry::wrap(bubble_shape_size(), None);
        let err = entry
            .evaluate("dot_shapeSize", Some(&42_u8 as &Ambient), &[])
            .unwrap_err();
        assert!(matches!(err, ChainError::Producer { .. }));
    }

    #[test]
    fn test_legend_shape_color() {
        let on = MarkScene::new().with_color("#ffffff");
        let off = on.clone().with_on(false);
        assert_eq!(run(legend_shape_color(colors()), None, &on, &[]), Ok(json!("#ffffff")));
        assert_eq!(run(legend_shape_color(colors()), None, &off, &[]), Ok(json!("#c8c8c8")));
    }

    #[test]
    fn test_legend_label_trimmed() {
        let scene = MarkScene::new();
        let label = run(
            legend_label(117.0, "10px OpenSansRegular"),
            Some(json!("Quarterly revenue by product line")),
            &scene,
            &[],
        );
        assert_eq!(label, Ok(json!("Quarterly revenue..")));
    }

    #[test]
    fn test_legend_label_needs_base() {
        let err = run(legend_label(117.0, "10px x"), None, &MarkScene::new(), &[]).unwrap_err();
        assert!(err.is_no_predecessor());
    }

    #[test]
    fn test_numeric_ticks() {
        let formats = Arc::new(FormatterCache::default());
        let scene = MarkScene::new();
        let tick = |args: &[Value]| run(numeric_tick_formatter(Arc::clone(&formats)), None, &scene, args);

        assert_eq!(tick(&[json!(2500), json!(0), json!(10)]), Ok(json!("2 500")));
        assert_eq!(tick(&[json!(2500), json!(1), json!(1000)]), Ok(json!("2.5 k")));
        assert!(tick(&[json!("x")]).is_err());
    }

    #[test]
    fn test_discrete_ticks() {
        let scene = MarkScene::new();
        let tick = |args: &[Value]| run(discrete_tick_formatter(), None, &scene, args);

        assert_eq!(tick(&[json!("2017-01"), json!("Jan")]), Ok(json!("Jan")));
        assert_eq!(
            tick(&[json!(1483228800000_i64), json!("Jan"), json!("date")]),
            Ok(json!("1483228800000"))
        );
        assert_eq!(tick(&[]), Ok(Value::Null));
    }

    #[test]
    fn test_bubble_size() {
        let unbound = MarkScene::new();
        let bound = MarkScene::new().with_size_role_bound(true);
        assert_eq!(run(bubble_shape_size(), Some(json!(80)), &unbound, &[]), Ok(json!(25)));
        assert_eq!(run(bubble_shape_size(), Some(json!(80)), &bound, &[]), Ok(json!(80)));
    }

    #[test]
    fn test_discrete_grid_lines() {
        let first = MarkScene::new().on_discrete_axis(0, 40.0);
        let second = MarkScene::new().on_discrete_axis(1, 40.0);
        let continuous = MarkScene::new();

        assert_eq!(run(grid_visible(), Some(json!(true)), &first, &[]), Ok(json!(false)));
        assert_eq!(run(grid_visible(), Some(json!(true)), &second, &[]), Ok(json!(true)));
        assert_eq!(run(grid_visible(), Some(json!(false)), &continuous, &[]), Ok(json!(false)));

        assert_eq!(run(grid_left(), Some(json!(100)), &second, &[]), Ok(json!(80.0)));
        assert_eq!(run(grid_left(), Some(json!(100)), &continuous, &[]), Ok(json!(100)));
    }
}
