//! Delegation chains built while folding deferred values.
//!
//! Each deferred value wraps the entry that was accumulated for its key before
//! it, so a chain reads like middleware: the outermost link belongs to the
//! highest-priority rule and the innermost to the lowest.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::ChainError;
use crate::value::{Deferred, Finished, Value};

/// Opaque per-instance state owned by the renderer.
pub type Ambient = dyn Any + Send + Sync;

/// Effective value of one key after merging.
#[derive(Clone)]
pub enum Entry {
    /// A literal the last literal-setting rule assigned.
    Literal(Value),
    /// A producer chain, evaluated on demand.
    Chain(Chain),
}

impl Entry {
    pub(crate) fn wrap(producer: Deferred, predecessor: Option<Entry>) -> Self {
        Entry::Chain(Chain(Arc::new(Link {
            producer,
            predecessor,
        })))
    }

    /// Evaluates the entry for `key`.
    ///
    /// Literals are returned as is. Chains run their outermost producer with
    /// `ambient` and `args`; both are forwarded unchanged down the chain.
    pub fn evaluate(
        &self,
        key: &str,
        ambient: Option<&Ambient>,
        args: &[Value],
    ) -> Result<Value, ChainError> {
        match self {
            Entry::Literal(value) => Ok(value.clone()),
            Entry::Chain(chain) => chain.evaluate(key, ambient, args),
        }
    }

    /// The literal value, if the entry is not deferred.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Entry::Literal(value) => Some(value),
            Entry::Chain(_) => None,
        }
    }

    /// Returns `true` if evaluating this entry runs at least one producer.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Entry::Chain(_))
    }

    /// Number of producers stacked in this entry (0 for literals).
    pub fn depth(&self) -> usize {
        match self {
            Entry::Literal(_) => 0,
            Entry::Chain(chain) => chain.depth(),
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Entry::Literal(a), Entry::Literal(b)) => a == b,
            (Entry::Chain(a), Entry::Chain(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Entry::Chain(chain) => f
                .debug_struct("Chain")
                .field("depth", &chain.depth())
                .finish(),
        }
    }
}

/// A linked list of producers, outermost first.
#[derive(Clone)]
pub struct Chain(Arc<Link>);

struct Link {
    producer: Deferred,
    predecessor: Option<Entry>,
}

impl Chain {
    fn evaluate(
        &self,
        key: &str,
        ambient: Option<&Ambient>,
        args: &[Value],
    ) -> Result<Value, ChainError> {
        let invocation = Invocation {
            key,
            predecessor: self.0.predecessor.as_ref(),
            ambient,
            args,
        };
        self.0.producer.call(&invocation).map(Finished::into_value)
    }

    fn depth(&self) -> usize {
        1 + self.0.predecessor.as_ref().map_or(0, Entry::depth)
    }
}

/// Two chains are equal when every link shares the same producer and their
/// innermost entries are equal.
impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.producer.ptr_eq(&other.0.producer)
                && self.0.predecessor == other.0.predecessor)
    }
}

/// Handle a deferred producer receives when it runs.
///
/// It gives access to the predecessor in the chain, the ambient state and the
/// call arguments, and it is the only way to build a [`Finished`] value.
pub struct Invocation<'a> {
    key: &'a str,
    predecessor: Option<&'a Entry>,
    ambient: Option<&'a Ambient>,
    args: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// The key being evaluated.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Returns `true` if a lower-priority value exists to delegate to.
    pub fn has_predecessor(&self) -> bool {
        self.predecessor.is_some()
    }

    /// Evaluates the lower-priority value for this key.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NoPredecessorValue`] when no lower-priority rule
    /// set the key, or any error the predecessor producer reports.
    pub fn delegate(&self) -> Result<Value, ChainError> {
        match self.predecessor {
            Some(entry) => entry.evaluate(self.key, self.ambient, self.args),
            None => Err(ChainError::NoPredecessorValue {
                key: self.key.to_string(),
            }),
        }
    }

    /// Alias of [`delegate`](Self::delegate).
    pub fn base(&self) -> Result<Value, ChainError> {
        self.delegate()
    }

    /// Delegates, substituting `fallback()` when there is no predecessor.
    ///
    /// Errors raised by the predecessor itself are still returned.
    pub fn delegate_or_else<F>(&self, fallback: F) -> Result<Value, ChainError>
    where
        F: FnOnce() -> Value,
    {
        match self.delegate() {
            Err(err) if err.is_no_predecessor() => Ok(fallback()),
            other => other,
        }
    }

    /// Completes this producer with `value`.
    pub fn finished(&self, value: impl Into<Value>) -> Finished {
        Finished::new(value.into())
    }

    /// The ambient state, if it has type `T`.
    pub fn ambient<T: Any>(&self) -> Option<&'a T> {
        self.ambient.and_then(|state| state.downcast_ref::<T>())
    }

    /// The ambient state as `T`, or a [`ChainError::Producer`] naming the
    /// expected type.
    pub fn require_ambient<T: Any>(&self) -> Result<&'a T, ChainError> {
        self.ambient::<T>().ok_or_else(|| {
            self.fail(format!(
                "ambient state is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Arguments the renderer passed when evaluating the key.
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// The argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    /// Builds a [`ChainError::Producer`] for this key.
    pub fn fail(&self, message: impl Into<String>) -> ChainError {
        ChainError::Producer {
            key: self.key.to_string(),
            message: message.into(),
        }
    }
}
