//! Text measuring and trimming for labels.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Size used when a font string carries no readable pixel size.
const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Truncates a string to fit within `max_width` display columns, ending it
/// with `ellipsis` when anything was cut.
///
/// Widths follow Unicode East Asian Width rules, so wide characters count as
/// two columns. The ellipsis is part of the budget; when even the ellipsis
/// does not fit, the ellipsis alone is returned.
///
/// # Example
///
/// ```rust
/// use vizrule::text::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Hello", 10, ".."), "Hello");
/// assert_eq!(truncate_to_width("Hello World", 7, ".."), "Hello..");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize, ellipsis: &str) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let limit = max_width.saturating_sub(ellipsis.width());
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }

    result.push_str(ellipsis);
    result
}

/// The pixel size of a CSS font shorthand such as `"10px OpenSansRegular"`.
pub fn font_size(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px"))
        .and_then(|size| size.parse::<f64>().ok())
        .filter(|size| *size > 0.0)
}

/// How many display columns fit in `width_px` pixels for `font`.
pub fn columns_for(width_px: f64, font: &str) -> usize {
    let size = font_size(font).unwrap_or(DEFAULT_FONT_SIZE);
    let columns = width_px / (size * GLYPH_WIDTH_RATIO);
    if columns.is_finite() && columns > 0.0 {
        columns.floor() as usize
    } else {
        0
    }
}

/// Trims `text` so that it, plus `ellipsis` when trimmed, fits in
/// `width_px` pixels rendered with `font`.
pub fn trim_to_pixel_width(width_px: f64, text: &str, font: &str, ellipsis: &str) -> String {
    truncate_to_width(text, columns_for(width_px, font), ellipsis)
}
