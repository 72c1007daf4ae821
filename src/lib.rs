//! Priority-ordered styling rules for chart configuration.
//!
//! A chart's effective configuration is assembled from many rules, each
//! saying "for charts of this type, inside this host application, set these
//! keys". This crate evaluates such rules for one chart instance:
//!
//! 1. Keep the rules whose [`Selector`] matches the chart type (through an
//!    injected [`TypeHierarchy`]) and the active application tags
//! 2. Order them by ascending priority; equal priorities keep declaration order
//! 3. Fold them lowest first: literals replace, [`Deferred`] values stack into
//!    a delegation chain that runs when the key is evaluated
//!
//! # Modules
//!
//! - [`rule`]: rules, selectors and validated rule sets
//! - [`resolve`]: the resolver, evaluation context and resolved configuration
//! - [`hierarchy`]: the type-hierarchy seam and two implementations
//! - [`format`]: number formatting and the formatter cache
//! - [`color`]: color operations for interaction styles
//! - [`text`]: label width measuring and trimming
//! - [`viz_api`]: the built-in rule table
//!
//! # Example
//!
//! ```rust
//! use vizrule::{Deferred, Resolver, Rule, RuleSet, Selector, TypeRegistry};
//! use serde_json::json;
//!
//! let registry = TypeRegistry::new()
//!     .register("abstract")?
//!     .register_child("bar", "abstract")?;
//!
//! let rules = RuleSet::new(vec![
//!     Rule::new()
//!         .with_priority(-5)
//!         .with_select(Selector::of_type("abstract"))
//!         .extension("width", 3),
//!     Rule::new()
//!         .with_priority(-1)
//!         .with_select(Selector::of_type("bar"))
//!         .extension("width", Deferred::new(|inv| {
//!             let base = inv.delegate()?.as_i64().unwrap_or(0);
//!             Ok(inv.finished(base * 2))
//!         })),
//! ])?;
//!
//! let config = Resolver::new(registry).resolve(&rules, "bar", None::<&str>, None);
//! assert_eq!(config.extension_value("width"), Some(Ok(json!(6))));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Logging
//!
//! The crate logs through [`tracing`] and never installs a subscriber.
//! Resolutions are reported at `debug`, per-rule decisions at `trace`.

pub mod color;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod resolve;
pub mod rule;
pub mod text;
pub mod value;
pub mod viz_api;

pub use color::{ColorOps, Rgba, StandardColors};
pub use error::{ChainError, HierarchyError, RuleError};
pub use format::{FormatKey, FormatterCache, NumberFormat, NumberStyle};
pub use hierarchy::{FlatHierarchy, TypeHierarchy, TypeRegistry};
pub use resolve::{
    Ambient, Chain, Entry, EvaluationContext, Invocation, ResolvedConfig, Resolver, Section,
};
pub use rule::{Apply, Namespace, Rule, RuleSet, Selector};
pub use value::{Deferred, Finished, StyleValue, Value};
pub use viz_api::{MarkScene, VizApi};
