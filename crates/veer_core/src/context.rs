//! Scoped context
//!
//! Values are provided into a [`Scope`] keyed by their type and looked up by
//! any descendant scope. The page shell owns the root scope; subtrees get a
//! [`Scope::child`]. Nothing is stored in module-level statics, so two trees
//! in the same process never observe each other's values.
//!
//! ```rust
//! use veer_core::context::Scope;
//!
//! #[derive(Debug)]
//! struct Locale(&'static str);
//!
//! let root = Scope::root();
//! root.provide(Locale("en")).unwrap();
//!
//! let leaf = root.child().child();
//! assert_eq!(leaf.consume::<Locale>().unwrap().0, "en");
//! ```

use crate::sync::lock;
use rustc_hash::FxHashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Context lookup and registration failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("no provider found for `{type_name}`")]
    NotProvided { type_name: &'static str },

    #[error("`{type_name}` is already provided in this scope")]
    AlreadyProvided { type_name: &'static str },
}

type Entry = Arc<dyn Any + Send + Sync>;

struct ScopeInner {
    parent: Option<Scope>,
    depth: usize,
    values: Mutex<FxHashMap<TypeId, Entry>>,
}

/// A node in the dependency-injection tree
///
/// Cloning yields another handle to the same node.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    /// Create a new root scope
    pub fn root() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                parent: None,
                depth: 0,
                values: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Create a child scope that sees everything provided above it
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                parent: Some(self.clone()),
                depth: self.inner.depth + 1,
                values: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Distance from the root
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Provide a value to this scope and its descendants
    ///
    /// Fails if this scope already holds a value of the same type. A value
    /// of the same type held by an ancestor is shadowed for this subtree.
    pub fn provide<T: Any + Send + Sync>(&self, value: T) -> Result<Arc<T>, ContextError> {
        let type_id = TypeId::of::<T>();
        let shared = Arc::new(value);
        {
            let mut values = lock(&self.inner.values);
            if values.contains_key(&type_id) {
                return Err(ContextError::AlreadyProvided {
                    type_name: type_name::<T>(),
                });
            }
            values.insert(type_id, shared.clone() as Entry);
        }

        if let Some(parent) = &self.inner.parent {
            if parent.lookup(type_id).is_some() {
                tracing::warn!(
                    "`{}` provided at depth {} shadows an outer provider",
                    type_name::<T>(),
                    self.inner.depth
                );
            }
        }
        Ok(shared)
    }

    /// Find the nearest value of type `T`
    pub fn consume<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ContextError> {
        self.try_consume().ok_or(ContextError::NotProvided {
            type_name: type_name::<T>(),
        })
    }

    pub fn try_consume<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.lookup(TypeId::of::<T>())
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    /// True if `T` is visible from this scope
    pub fn is_provided<T: Any + Send + Sync>(&self) -> bool {
        self.lookup(TypeId::of::<T>()).is_some()
    }

    /// Remove the value of type `T` from this scope (ancestors are untouched)
    pub fn withdraw<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        lock(&self.inner.values)
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    fn lookup(&self, type_id: TypeId) -> Option<Entry> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(entry) = lock(&current.inner.values).get(&type_id) {
                return Some(Arc::clone(entry));
            }
            scope = current.inner.parent.as_ref();
        }
        None
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.inner.depth)
            .field("values", &lock(&self.inner.values).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[test]
    fn test_consume_without_provider_fails() {
        let root = Scope::root();
        let err = root.child().consume::<Counter>().unwrap_err();
        assert!(matches!(err, ContextError::NotProvided { .. }));
        assert!(err.to_string().contains("Counter"));
    }

    #[test]
    fn test_descendants_see_provided_value() {
        let root = Scope::root();
        root.provide(Counter(1)).unwrap();
        let leaf = root.child().child();
        assert_eq!(leaf.depth(), 2);
        assert_eq!(*leaf.consume::<Counter>().unwrap(), Counter(1));
    }

    #[test]
    fn test_duplicate_in_same_scope_is_rejected() {
        let root = Scope::root();
        root.provide(Counter(1)).unwrap();
        assert!(matches!(
            root.provide(Counter(2)),
            Err(ContextError::AlreadyProvided { .. })
        ));
        assert_eq!(*root.consume::<Counter>().unwrap(), Counter(1));
    }

    #[test]
    fn test_inner_provider_shadows_outer() {
        let root = Scope::root();
        root.provide(Counter(1)).unwrap();
        let inner = root.child();
        inner.provide(Counter(2)).unwrap();

        assert_eq!(*inner.child().consume::<Counter>().unwrap(), Counter(2));
        assert_eq!(*root.consume::<Counter>().unwrap(), Counter(1));
    }

    #[test]
    fn test_withdraw_reveals_outer_value() {
        let root = Scope::root();
        root.provide(Counter(1)).unwrap();
        let inner = root.child();
        inner.provide(Counter(2)).unwrap();

        assert_eq!(*inner.withdraw::<Counter>().unwrap(), Counter(2));
        assert_eq!(*inner.consume::<Counter>().unwrap(), Counter(1));
        assert!(inner.withdraw::<Counter>().is_none());
    }

    #[test]
    fn test_separate_roots_are_isolated() {
        let a = Scope::root();
        let b = Scope::root();
        a.provide(Counter(1)).unwrap();
        assert!(a.is_provided::<Counter>());
        assert!(!b.is_provided::<Counter>());
    }
}
