//! Mask-based number formatting.

use serde::Deserialize;
use serde_json::json;

use crate::value::Value;

/// Separators and abbreviation suffixes used by [`NumberFormat`].
///
/// Deserializes from the same shape [`to_value`](Self::to_value) produces;
/// missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NumberStyle {
    pub group: String,
    pub decimal: String,
    /// Suffixes for 10^3, 10^6, ...
    pub abbreviations: Vec<String>,
    /// Suffixes for 10^-3, 10^-6, ...
    pub sub_abbreviations: Vec<String>,
}

impl NumberStyle {
    /// The style as a literal configuration value.
    pub fn to_value(&self) -> Value {
        json!({
            "group": self.group,
            "decimal": self.decimal,
            "abbreviations": self.abbreviations,
            "subAbbreviations": self.sub_abbreviations,
        })
    }
}

impl Default for NumberStyle {
    fn default() -> Self {
        let to_strings =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            group: " ".to_string(),
            decimal: ".".to_string(),
            abbreviations: to_strings(&["k", "M", "G", "T", "P", "E", "Z", "Y"]),
            sub_abbreviations: to_strings(&["m", "µ", "n", "p", "f", "a", "z", "y"]),
        }
    }
}

/// An immutable number formatter.
///
/// The mask is `#,0` followed by the decimal part (`.00` for precision 2,
/// `.##` for "up to two" when precision is 0) and ` A` when abbreviating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    precision: usize,
    abbreviate: bool,
    style: NumberStyle,
}

impl NumberFormat {
    pub fn new(precision: usize, abbreviate: bool, style: NumberStyle) -> Self {
        Self {
            precision,
            abbreviate,
            style,
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn abbreviates(&self) -> bool {
        self.abbreviate
    }

    /// The mask this formatter implements, e.g. `#,0.00 A`.
    pub fn mask(&self) -> String {
        let decimals = if self.precision > 0 {
            format!(".{}", "0".repeat(self.precision))
        } else {
            ".##".to_string()
        };
        let suffix = if self.abbreviate { " A" } else { "" };
        format!("#,0{decimals}{suffix}")
    }

    /// Formats `value`.
    ///
    /// ```rust
    /// use vizrule::{NumberFormat, NumberStyle};
    ///
    /// let plain = NumberFormat::new(0, false, NumberStyle::default());
    /// assert_eq!(plain.format(1234567.0), "1 234 567");
    /// assert_eq!(plain.format(1234.5), "1 234.5");
    ///
    /// let abbreviated = NumberFormat::new(1, true, NumberStyle::default());
    /// assert_eq!(abbreviated.format(2_500_000.0), "2.5 M");
    /// ```
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let (scaled, suffix) = if self.abbreviate {
            self.scale(value)
        } else {
            (value, None)
        };

        let digits = if self.precision > 0 {
            format!("{:.*}", self.precision, scaled.abs())
        } else {
            let fixed = format!("{:.*}", self.decimals(), scaled.abs());
            fixed
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (digits.as_str(), None),
        };

        let mut out = String::new();
        let is_zero = digits.chars().all(|c| c == '0' || c == '.');
        if scaled < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&self.group_digits(int_part));
        if let Some(frac) = frac_part {
            out.push_str(&self.style.decimal);
            out.push_str(frac);
        }
        if let Some(suffix) = suffix {
            out.push(' ');
            out.push_str(suffix);
        }
        out
    }

    /// Decimal places actually printed: `precision`, or up to two when 0.
    fn decimals(&self) -> usize {
        if self.precision > 0 {
            self.precision
        } else {
            2
        }
    }

    /// `magnitude` rounded the way it will be printed.
    fn rounded(&self, magnitude: f64) -> f64 {
        let factor = 10_f64.powi(i32::try_from(self.decimals()).unwrap_or(i32::MAX));
        if factor.is_finite() {
            (magnitude * factor).round() / factor
        } else {
            magnitude
        }
    }

    /// Picks the suffix from the printed value, so a magnitude that rounds
    /// up to 1000 moves to the next suffix.
    fn scale(&self, value: f64) -> (f64, Option<&str>) {
        let mut magnitude = value.abs();
        if self.rounded(magnitude) >= 1000.0 {
            let mut index = 0;
            while self.rounded(magnitude) >= 1000.0 && index < self.style.abbreviations.len() {
                magnitude /= 1000.0;
                index += 1;
            }
            let suffix = index
                .checked_sub(1)
                .and_then(|i| self.style.abbreviations.get(i))
                .map(String::as_str);
            (magnitude.copysign(value), suffix)
        } else if magnitude > 0.0 && self.rounded(magnitude) < 1.0 {
            let mut index = 0;
            while self.rounded(magnitude) < 1.0 && index < self.style.sub_abbreviations.len() {
                magnitude *= 1000.0;
                index += 1;
            }
            let suffix = index
                .checked_sub(1)
                .and_then(|i| self.style.sub_abbreviations.get(i))
                .map(String::as_str);
            (magnitude.copysign(value), suffix)
        } else {
            (value, None)
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3 * self.style.group.len());
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(&self.style.group);
            }
            out.push(c);
        }
        out
    }
}
