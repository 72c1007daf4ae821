//! Error types for rule loading, hierarchy construction and value chains.

use thiserror::Error;

/// Error returned when a rule set fails validation.
///
/// Validation happens once, when the set is built. A single bad rule rejects
/// the whole set so that a partially applied theme never reaches a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A rule has no usable match path or an unusable effect.
    #[error("rule #{index} is malformed: {reason}")]
    MalformedRule { index: usize, reason: String },
}

/// Error returned while building a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The type was already registered.
    #[error("type '{0}' is already registered")]
    DuplicateType(String),
    /// The parent of a type must be registered before the type itself.
    #[error("type '{child}' names unregistered parent '{parent}'")]
    UnknownParent { child: String, parent: String },
}

/// Error raised while evaluating a deferred value chain.
///
/// These errors are local to one key: evaluating one key never aborts the
/// evaluation of another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A producer called `delegate()` but nothing lower in priority set the key.
    #[error("no predecessor value for '{key}'")]
    NoPredecessorValue { key: String },
    /// A producer reported a failure of its own.
    #[error("producer for '{key}' failed: {message}")]
    Producer { key: String, message: String },
}

impl ChainError {
    /// Returns `true` for [`ChainError::NoPredecessorValue`].
    pub fn is_no_predecessor(&self) -> bool {
        matches!(self, ChainError::NoPredecessorValue { .. })
    }

    /// The key whose evaluation failed.
    pub fn key(&self) -> &str {
        match self {
            ChainError::NoPredecessorValue { key } | ChainError::Producer { key, .. } => key,
        }
    }
}
