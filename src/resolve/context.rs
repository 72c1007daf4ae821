//! The per-call evaluation context.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::chain::Ambient;

/// What a resolution call is resolving for: a chart type, the active
/// application tags, and the renderer's opaque ambient state.
///
/// # Example
///
/// ```rust
/// use vizrule::EvaluationContext;
///
/// let context = EvaluationContext::new("pentaho/ccc/visual/bar")
///     .with_application("pentaho-cdf");
///
/// assert_eq!(context.target(), "pentaho/ccc/visual/bar");
/// assert!(context.has_application("pentaho-cdf"));
/// assert!(!context.has_application("pentaho-det"));
/// ```
#[derive(Clone)]
pub struct EvaluationContext {
    target: String,
    applications: BTreeSet<String>,
    ambient: Option<Arc<Ambient>>,
}

impl EvaluationContext {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            applications: BTreeSet::new(),
            ambient: None,
        }
    }

    pub fn with_application(mut self, tag: impl Into<String>) -> Self {
        self.applications.insert(tag.into());
        self
    }

    pub fn with_applications<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applications.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Attaches the ambient state deferred producers may read.
    pub fn with_ambient<T: std::any::Any + Send + Sync>(self, ambient: T) -> Self {
        self.with_shared_ambient(Arc::new(ambient))
    }

    pub fn with_shared_ambient(mut self, ambient: Arc<Ambient>) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// The target chart type.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn applications(&self) -> impl Iterator<Item = &str> {
        self.applications.iter().map(String::as_str)
    }

    pub fn has_application(&self, tag: &str) -> bool {
        self.applications.contains(tag)
    }

    pub fn ambient(&self) -> Option<&Arc<Ambient>> {
        self.ambient.as_ref()
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("target", &self.target)
            .field("applications", &self.applications)
            .field("ambient", &self.ambient.is_some())
            .finish()
    }
}
