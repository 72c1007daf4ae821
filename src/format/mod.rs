//! Number formatting for axis ticks and labels.
//!
//! - [`NumberFormat`]: an immutable mask-based formatter
//! - [`NumberStyle`]: group separator and abbreviation suffixes
//! - [`FormatterCache`]: get-or-create memo keyed by `(use_abbreviation, precision)`

mod cache;
mod number;

pub use cache::{FormatKey, FormatterCache};
pub use number::{NumberFormat, NumberStyle};
