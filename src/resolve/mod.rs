//! Rule resolution.
//!
//! This module provides:
//!
//! - [`Resolver`]: filters, orders and folds a [`RuleSet`](crate::RuleSet)
//! - [`EvaluationContext`]: target type, application tags and ambient state
//! - [`ResolvedConfig`]: the merged result, one [`Entry`] per key
//! - [`Invocation`]: what a deferred producer sees while it runs
//!
//! Literal values replace what lower-priority rules set. Deferred values are
//! stacked into a chain instead, each link holding its predecessor, and only
//! run when the key is evaluated.

mod chain;
mod config;
mod context;
mod resolver;

pub use chain::{Ambient, Chain, Entry, Invocation};
pub use config::{ResolvedConfig, Section};
pub use context::EvaluationContext;
pub use resolver::Resolver;
