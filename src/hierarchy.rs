//! Type-hierarchy lookup used by the selector matcher.
//!
//! Chart types are registered by the host application; the engine only needs
//! to ask whether one type descends from another. [`TypeHierarchy`] is that
//! seam. Two implementations ship with the crate:
//!
//! - [`FlatHierarchy`]: no ancestry, every type is known
//! - [`TypeRegistry`]: a single-parent tree, acyclic by construction

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HierarchyError;

/// Ancestry queries over registered chart types.
pub trait TypeHierarchy: Send + Sync {
    /// Returns `true` if `ty` is registered.
    ///
    /// Typed selectors never match a target type that is not known.
    fn is_known(&self, ty: &str) -> bool;

    /// Returns `true` if `ancestor` is a strict ancestor of `candidate`.
    ///
    /// Must be `false` when either type is unknown.
    fn is_descendant_of(&self, candidate: &str, ancestor: &str) -> bool;
}

impl<H: TypeHierarchy + ?Sized> TypeHierarchy for Arc<H> {
    fn is_known(&self, ty: &str) -> bool {
        (**self).is_known(ty)
    }

    fn is_descendant_of(&self, candidate: &str, ancestor: &str) -> bool {
        (**self).is_descendant_of(candidate, ancestor)
    }
}

/// A hierarchy without inheritance: types only match themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl TypeHierarchy for FlatHierarchy {
    fn is_known(&self, _ty: &str) -> bool {
        true
    }

    fn is_descendant_of(&self, _candidate: &str, _ancestor: &str) -> bool {
        false
    }
}

/// A registry of chart types with single inheritance.
///
/// A type's parent must be registered before the type itself, which rules
/// out cycles.
///
/// # Example
///
/// ```rust
/// use vizrule::{TypeHierarchy, TypeRegistry};
///
/// let registry = TypeRegistry::new()
///     .register("abstract")?
///     .register_child("cartesianAbstract", "abstract")?
///     .register_child("bar", "cartesianAbstract")?;
///
/// assert!(registry.is_descendant_of("bar", "abstract"));
/// assert!(!registry.is_descendant_of("abstract", "bar"));
/// # Ok::<(), vizrule::HierarchyError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    parents: HashMap<String, Option<String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a root type.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::DuplicateType`] if `ty` is already registered.
    pub fn register(self, ty: impl Into<String>) -> Result<Self, HierarchyError> {
        self.insert(ty.into(), None)
    }

    /// Registers `ty` as a child of the already registered `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownParent`] if `parent` is not registered,
    /// or [`HierarchyError::DuplicateType`] if `ty` already is.
    pub fn register_child(
        self,
        ty: impl Into<String>,
        parent: impl Into<String>,
    ) -> Result<Self, HierarchyError> {
        let ty = ty.into();
        let parent = parent.into();
        if !self.parents.contains_key(&parent) {
            return Err(HierarchyError::UnknownParent { child: ty, parent });
        }
        self.insert(ty, Some(parent))
    }

    fn insert(mut self, ty: String, parent: Option<String>) -> Result<Self, HierarchyError> {
        if self.parents.contains_key(&ty) {
            return Err(HierarchyError::DuplicateType(ty));
        }
        self.parents.insert(ty, parent);
        Ok(self)
    }

    /// The direct parent of `ty`, if it has one.
    pub fn parent(&self, ty: &str) -> Option<&str> {
        self.parents.get(ty).and_then(|parent| parent.as_deref())
    }

    /// Strict ancestors of `ty`, nearest first.
    pub fn ancestors<'a>(&'a self, ty: &str) -> impl Iterator<Item = &'a str> + 'a {
        let mut current = self.parent(ty);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl TypeHierarchy for TypeRegistry {
    fn is_known(&self, ty: &str) -> bool {
        self.parents.contains_key(ty)
    }

    fn is_descendant_of(&self, candidate: &str, ancestor: &str) -> bool {
        self.ancestors(candidate).any(|ty| ty == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .register("abstract")
            .and_then(|r| r.register_child("cartesianAbstract", "abstract"))
            .and_then(|r| r.register_child("barAbstract", "cartesianAbstract"))
            .and_then(|r| r.register_child("bar", "barAbstract"))
            .and_then(|r| r.register_child("pie", "abstract"))
            .unwrap()
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let registry = registry();
        let ancestors: Vec<_> = registry.ancestors("bar").collect();
        assert_eq!(ancestors, vec!["barAbstract", "cartesianAbstract", "abstract"]);
        assert_eq!(registry.ancestors("abstract").count(), 0);
        assert_eq!(registry.ancestors("ghost").count(), 0);
    }

    #[test]
    fn test_descendant_is_strict() {
        let registry = registry();
        assert!(registry.is_descendant_of("bar", "abstract"));
        assert!(registry.is_descendant_of("pie", "abstract"));
        assert!(!registry.is_descendant_of("bar", "bar"));
        assert!(!registry.is_descendant_of("pie", "cartesianAbstract"));
    }

    #[test]
    fn test_unknown_types() {
        let registry = registry();
        assert!(!registry.is_known("ghost"));
        assert!(!registry.is_descendant_of("ghost", "abstract"));
        assert!(!registry.is_descendant_of("bar", "ghost"));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let err = TypeRegistry::new()
            .register_child("bar", "barAbstract")
            .unwrap_err();
        assert_eq!(
            err,
            HierarchyError::UnknownParent {
                child: "bar".to_string(),
                parent: "barAbstract".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let err = registry().register("pie").unwrap_err();
        assert_eq!(err, HierarchyError::DuplicateType("pie".to_string()));
    }

    #[test]
    fn test_flat_hierarchy() {
        assert!(FlatHierarchy.is_known("anything"));
        assert!(!FlatHierarchy.is_descendant_of("bar", "abstract"));
    }

    #[test]
    fn test_shared_hierarchy_delegates() {
        let shared: Arc<dyn TypeHierarchy> = Arc::new(registry());
        assert!(shared.is_descendant_of("bar", "cartesianAbstract"));
        assert_eq!(registry().len(), 5);
    }
}
