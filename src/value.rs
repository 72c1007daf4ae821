//! Rule values: literals and deferred producers.
//!
//! A rule assigns each key a [`StyleValue`]. Literals replace whatever a
//! lower-priority rule set before them. Deferred values wrap it instead: the
//! producer runs when the key is evaluated and may ask for the previous value
//! through [`Invocation::delegate`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
pub use serde_json::Value;

use crate::error::ChainError;
use crate::resolve::Invocation;

type ProducerFn = dyn Fn(&Invocation<'_>) -> Result<Finished, ChainError> + Send + Sync;

/// Completion value of a deferred producer.
///
/// Producers can only obtain one through [`Invocation::finished`], which makes
/// completion explicit in every producer body.
#[derive(Debug, Clone, PartialEq)]
pub struct Finished(Value);

impl Finished {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    /// The value the producer finished with.
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub(crate) fn into_value(self) -> Value {
        self.0
    }
}

/// A function-valued configuration entry.
///
/// Cloning is cheap; clones share the same producer.
///
/// # Example
///
/// ```rust
/// use vizrule::Deferred;
///
/// // Doubles whatever the lower-priority rules produced.
/// let double = Deferred::new(|inv| {
///     let base = inv.delegate()?.as_f64().unwrap_or(0.0);
///     Ok(inv.finished(base * 2.0))
/// });
/// # let _ = double;
/// ```
#[derive(Clone)]
pub struct Deferred {
    producer: Arc<ProducerFn>,
}

impl Deferred {
    /// Wraps a producer function.
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<Finished, ChainError> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// A producer that always finishes with `value` and never delegates.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move |inv| Ok(inv.finished(value.clone())))
    }

    pub(crate) fn call(&self, invocation: &Invocation<'_>) -> Result<Finished, ChainError> {
        (self.producer)(invocation)
    }

    /// Returns `true` if both handles share the same producer.
    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        Arc::ptr_eq(&self.producer, &other.producer)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// A value assigned to a key by a rule.
#[derive(Debug, Clone)]
pub enum StyleValue {
    /// Replaces any lower-priority value outright.
    Literal(Value),
    /// Computes the value, optionally from the lower-priority one.
    Deferred(Deferred),
}

impl StyleValue {
    /// Returns `true` for [`StyleValue::Literal`].
    pub fn is_literal(&self) -> bool {
        matches!(self, StyleValue::Literal(_))
    }

    /// Returns `true` for [`StyleValue::Deferred`].
    pub fn is_deferred(&self) -> bool {
        matches!(self, StyleValue::Deferred(_))
    }

    /// The literal value, if this is one.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            StyleValue::Literal(value) => Some(value),
            StyleValue::Deferred(_) => None,
        }
    }
}

impl PartialEq for StyleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StyleValue::Literal(a), StyleValue::Literal(b)) => a == b,
            (StyleValue::Deferred(a), StyleValue::Deferred(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<Value> for StyleValue {
    fn from(value: Value) -> Self {
        StyleValue::Literal(value)
    }
}

impl From<Deferred> for StyleValue {
    fn from(deferred: Deferred) -> Self {
        StyleValue::Deferred(deferred)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Literal(Value::from(value))
    }
}

/// Declarative data only carries literals; producers are attached in code.
impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(StyleValue::Literal)
    }
}
