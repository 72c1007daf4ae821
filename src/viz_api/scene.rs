//! The renderer state read by the built-in producers.

use crate::value::Value;

/// The state of one mark being styled.
///
/// The renderer builds one per evaluation and hands it over as the ambient
/// state, either at resolution time or through
/// [`ResolvedConfig::evaluate_with`](crate::ResolvedConfig::evaluate_with).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkScene {
    /// The mark reacts to selection and hover.
    pub shows_interaction: bool,
    /// Something is selected and this mark is not.
    pub not_among_selected: bool,
    /// The mark may render as active (hovered).
    pub may_show_active: bool,
    /// The mark is the active one.
    pub is_active: bool,
    /// Legend items: the series is visible.
    pub is_on: bool,
    /// The color the palette assigned.
    pub color: Option<Value>,
    /// The size visual role has a field mapped to it.
    pub size_role_bound: bool,
    /// The base axis is discrete.
    pub base_axis_discrete: bool,
    /// Position of the mark among its siblings.
    pub index: usize,
    /// Band width of the base axis, in pixels.
    pub band_step: f64,
    /// Label font, when the renderer knows it.
    pub font: Option<String>,
}

impl Default for MarkScene {
    fn default() -> Self {
        Self {
            shows_interaction: false,
            not_among_selected: false,
            may_show_active: false,
            is_active: false,
            is_on: true,
            color: None,
            size_role_bound: false,
            base_axis_discrete: false,
            index: 0,
            band_step: 0.0,
            font: None,
        }
    }
}

impl MarkScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<Value>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Marks the scene as interactive with the given selection state.
    pub fn interactive(mut self, not_among_selected: bool, active: bool) -> Self {
        self.shows_interaction = true;
        self.not_among_selected = not_among_selected;
        self.may_show_active = active;
        self.is_active = active;
        self
    }

    pub fn with_on(mut self, is_on: bool) -> Self {
        self.is_on = is_on;
        self
    }

    pub fn with_size_role_bound(mut self, bound: bool) -> Self {
        self.size_role_bound = bound;
        self
    }

    /// Places the mark on a discrete base axis with bands `band_step` wide.
    pub fn on_discrete_axis(mut self, index: usize, band_step: f64) -> Self {
        self.base_axis_discrete = true;
        self.index = index;
        self.band_step = band_step;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}
