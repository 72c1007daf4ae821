//! Memoized number formatters.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use super::number::{NumberFormat, NumberStyle};

/// Cache key: whether to abbreviate, and the number of decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatKey {
    pub use_abbreviation: bool,
    pub precision: usize,
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.use_abbreviation, self.precision)
    }
}

/// A get-or-create table of formatters sharing one [`NumberStyle`].
///
/// The key space is two-dimensional and small, so entries are never evicted.
/// Concurrent first requests for the same key build exactly one formatter:
/// the table lock is held across the insert.
#[derive(Debug)]
pub struct FormatterCache {
    style: NumberStyle,
    entries: Mutex<HashMap<FormatKey, Arc<NumberFormat>>>,
}

static GLOBAL_CACHE: Lazy<Arc<FormatterCache>> =
    Lazy::new(|| Arc::new(FormatterCache::new(NumberStyle::default())));

impl FormatterCache {
    pub fn new(style: NumberStyle) -> Self {
        Self {
            style,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide cache, created on first use with the default style.
    pub fn global() -> Arc<FormatterCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    pub fn style(&self) -> &NumberStyle {
        &self.style
    }

    /// Returns the formatter for `(use_abbreviation, precision)`, building it
    /// on first request. Repeated requests return the same instance.
    pub fn get_or_create(&self, use_abbreviation: bool, precision: usize) -> Arc<NumberFormat> {
        let key = FormatKey {
            use_abbreviation,
            precision,
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert_with(|| {
            tracing::trace!(key = %key, "building number formatter");
            Arc::new(NumberFormat::new(
                precision,
                use_abbreviation,
                self.style.clone(),
            ))
        }))
    }

    /// The formatter for axis ticks with the given `precision` on a scale
    /// whose magnitude is `base`. Values abbreviate once `base` reaches 1000.
    pub fn number_formatter(&self, precision: usize, base: f64) -> Arc<NumberFormat> {
        self.get_or_create(base >= 1000.0, precision)
    }

    /// Number of formatters built so far.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FormatterCache {
    fn default() -> Self {
        Self::new(NumberStyle::default())
    }
}
