//! Color operations used by the built-in interaction styles.
//!
//! Colors travel through resolved configurations as CSS strings
//! (`"#1f77b4"`, `"rgb(31, 119, 180)"`, `"rgba(0,0,0,0.5)"` or a basic
//! name). [`ColorOps`] is the capability the built-in producers call; the
//! renderer may inject its own implementation, and [`StandardColors`] is the
//! one this crate ships.

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::value::Value;

/// The color capability consumed by the built-in rule table.
///
/// Every operation takes and returns color values. Values the implementation
/// cannot read are returned unchanged.
pub trait ColorOps: Send + Sync {
    /// Reads a color value.
    fn parse(&self, color: &Value) -> Option<Rgba>;

    /// The gray with the same perceived lightness as `color`.
    ///
    /// `None` keeps the color's opacity. A negative `alpha` is a factor
    /// applied to it (`-0.3` gives 30% of the original opacity).
    fn to_gray_scale(&self, color: &Value, alpha: Option<f64>) -> Value;

    /// `color` with its opacity replaced by `alpha`.
    fn with_alpha(&self, color: &Value, alpha: f64) -> Value;

    /// `color` darkened `k` steps.
    fn darker(&self, color: &Value, k: f64) -> Value;

    /// A named color, if the name is known.
    fn named(&self, name: &str) -> Option<Value>;
}

/// An sRGB color with opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("silver", (192, 192, 192)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
];

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses a CSS color string. Returns `None` for anything else.
    ///
    /// ```rust
    /// use vizrule::color::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#fff"), Some(Rgba::rgb(255, 255, 255)));
    /// assert_eq!(Rgba::parse("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
    /// assert_eq!(Rgba::parse("darkgray"), Some(Rgba::rgb(169, 169, 169)));
    /// assert_eq!(Rgba::parse("not a color"), None);
    /// ```
    pub fn parse(css: &str) -> Option<Self> {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let color = parse_color(&mut parser).ok()?;
        parser.expect_exhausted().ok()?;
        Some(color)
    }

    /// The CSS form: `#rrggbb` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = (self.a * 1000.0).round() / 1000.0;
            format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Multiplies each channel by `0.7^k`, keeping opacity.
    pub fn darker(self, k: f64) -> Self {
        let factor = 0.7_f64.powf(k);
        let scale = |c: u8| (f64::from(c) * factor).floor().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Luma-weighted gray, mapped into `[30, 200]` so it never reaches
    /// white or black.
    pub fn gray_scale(self, alpha: Option<f64>) -> Self {
        const MIN_LEVEL: f64 = 30.0;
        const MAX_LEVEL: f64 = 200.0;

        let luma = 0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b);
        let level = (MIN_LEVEL + luma / 255.0 * (MAX_LEVEL - MIN_LEVEL)).round() as u8;
        let a = match alpha {
            None => self.a,
            Some(a) if a < 0.0 => -a * self.a,
            Some(a) => a,
        };
        Self {
            r: level,
            g: level,
            b: level,
            a: a.clamp(0.0, 1.0),
        }
    }
}

fn parse_color<'i>(parser: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let token = parser.next()?.clone();
    match token {
        Token::Hash(ref digits) | Token::IDHash(ref digits) => {
            parse_hex(digits).ok_or_else(|| parser.new_custom_error(()))
        }
        Token::Ident(ref name) => named_rgb(name).ok_or_else(|| parser.new_custom_error(())),
        Token::Function(ref name) if name.eq_ignore_ascii_case("rgb") => {
            parser.parse_nested_block(|args| -> Result<Rgba, ParseError<'i, ()>> {
                let (r, g, b) = parse_channels(args)?;
                Ok(Rgba::rgb(r, g, b))
            })
        }
        Token::Function(ref name) if name.eq_ignore_ascii_case("rgba") => {
            parser.parse_nested_block(|args| -> Result<Rgba, ParseError<'i, ()>> {
                let (r, g, b) = parse_channels(args)?;
                args.expect_comma()?;
                let alpha = f64::from(args.expect_number()?);
                Ok(Rgba::rgb(r, g, b).with_alpha(alpha))
            })
        }
        _ => Err(parser.new_custom_error(())),
    }
}

fn parse_channels<'i>(args: &mut Parser<'i, '_>) -> Result<(u8, u8, u8), ParseError<'i, ()>> {
    let r = channel(args.expect_number()?);
    args.expect_comma()?;
    let g = channel(args.expect_number()?);
    args.expect_comma()?;
    let b = channel(args.expect_number()?);
    Ok((r, g, b))
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn named_rgb(name: &str) -> Option<Rgba> {
    NAMED
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, (r, g, b))| Rgba::rgb(*r, *g, *b))
}

/// The default [`ColorOps`]: CSS strings in, CSS strings out.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardColors;

impl StandardColors {
    fn map(&self, color: &Value, f: impl FnOnce(Rgba) -> Rgba) -> Value {
        match self.parse(color) {
            Some(rgba) => Value::String(f(rgba).to_css()),
            None => color.clone(),
        }
    }
}

impl ColorOps for StandardColors {
    fn parse(&self, color: &Value) -> Option<Rgba> {
        color.as_str().and_then(Rgba::parse)
    }

    fn to_gray_scale(&self, color: &Value, alpha: Option<f64>) -> Value {
        self.map(color, |c| c.gray_scale(alpha))
    }

    fn with_alpha(&self, color: &Value, alpha: f64) -> Value {
        self.map(color, |c| c.with_alpha(alpha))
    }

    fn darker(&self, color: &Value, k: f64) -> Value {
        self.map(color, |c| c.darker(k))
    }

    fn named(&self, name: &str) -> Option<Value> {
        named_rgb(name).map(|rgba| Value::String(rgba.to_css()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Rgba::parse("#1f77b4"), Some(Rgba::rgb(31, 119, 180)));
        assert_eq!(Rgba::parse("#ABC"), Some(Rgba::rgb(170, 187, 204)));
        assert_eq!(Rgba::parse(" RGB(10,20,30) "), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(
            Rgba::parse("rgba(10, 20, 30, 0.5)"),
            Some(Rgba::rgb(10, 20, 30).with_alpha(0.5))
        );
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#gggggg"), None);
        assert_eq!(Rgba::parse("rgb(1,2)"), None);
        assert_eq!(Rgba::parse("rgba(1,2,3)"), None);
        assert_eq!(Rgba::parse("chartreuse-ish"), None);
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_css(), "#ff0010");
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(0.8).to_css(), "rgba(1,2,3,0.8)");
    }

    #[test]
    fn test_darker() {
        let dark = Rgba::rgb(169, 169, 169).darker(2.0);
        assert_eq!(dark, Rgba::rgb(82, 82, 82));
        assert_eq!(Rgba::rgb(100, 0, 10).darker(0.0), Rgba::rgb(100, 0, 10));
    }

    #[test]
    fn test_gray_scale_range() {
        assert_eq!(Rgba::rgb(0, 0, 0).gray_scale(None), Rgba::rgb(30, 30, 30));
        assert_eq!(Rgba::rgb(255, 255, 255).gray_scale(None), Rgba::rgb(200, 200, 200));
    }

    #[test]
    fn test_gray_scale_alpha() {
        let translucent = Rgba::rgb(255, 255, 255).with_alpha(0.5);
        assert_eq!(translucent.gray_scale(None).a, 0.5);
        assert!((translucent.gray_scale(Some(-0.3)).a - 0.15).abs() < 1e-9);
        assert_eq!(translucent.gray_scale(Some(0.9)).a, 0.9);
    }

    #[test]
    fn test_standard_colors_values() {
        let colors = StandardColors;
        assert_eq!(
            colors.to_gray_scale(&json!("#ffffff"), Some(-0.3)),
            json!("rgba(200,200,200,0.3)")
        );
        assert_eq!(colors.with_alpha(&json!("red"), 0.5), json!("rgba(255,0,0,0.5)"));
        assert_eq!(colors.darker(&json!("white"), 1.0), json!("#b2b2b2"));
        assert_eq!(colors.named("DarkGray"), Some(json!("#a9a9a9")));
        assert_eq!(colors.named("nope"), None);
    }

    #[test]
    fn test_unreadable_values_pass_through() {
        let colors = StandardColors;
        assert_eq!(colors.with_alpha(&json!("bogus"), 0.5), json!("bogus"));
        assert_eq!(colors.darker(&json!(null), 2.0), json!(null));
        assert_eq!(colors.to_gray_scale(&json!(3), None), json!(3));
    }
}
