//! Bean definitions and the definition registry.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::DuplicatePolicy;
use crate::descriptors::BeanClass;
use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Type-erased bean as stored by the container.
///
/// The erased value is always an `Arc<T>` for the requested `T`, which lets
/// trait objects share the same storage as concrete types.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Converts a freshly built implementation instance into the requested type.
pub(crate) type Adapter = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

#[inline]
pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyArc {
    Arc::new(value)
}

#[inline]
pub(crate) fn unerase<T: ?Sized + Send + Sync + 'static>(value: &AnyArc) -> DiResult<Arc<T>> {
    value
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// Mapping from a requested type to its implementing class
pub(crate) struct BeanDefinition {
    pub(crate) requested: Key,
    pub(crate) class: Arc<BeanClass>,
    /// `None` when the requested type is its own implementation
    pub(crate) adapter: Option<Adapter>,
}

impl BeanDefinition {
    pub(crate) fn implementation(&self) -> Key {
        self.class.key()
    }

    /// Converts an implementation instance into the requested type.
    pub(crate) fn adapt(&self, instance: AnyArc) -> DiResult<AnyArc> {
        match &self.adapter {
            Some(adapter) => adapter(instance),
            None => Ok(instance),
        }
    }
}

/// Definition registry, in insertion order
pub(crate) struct Registry {
    definitions: IndexMap<Key, BeanDefinition>,
    policy: DuplicatePolicy,
}

impl Registry {
    pub(crate) fn new(policy: DuplicatePolicy) -> Self {
        Self {
            definitions: IndexMap::new(),
            policy,
        }
    }

    /// Stores a definition after checking the implementation is concrete.
    ///
    /// On failure the registry is left untouched. Replacing an existing
    /// definition keeps its original position in the iteration order.
    pub(crate) fn register(
        &mut self,
        requested: Key,
        class: BeanClass,
        adapter: Option<Adapter>,
    ) -> DiResult<()> {
        if !class.is_concrete() {
            return Err(DiError::NotConcrete {
                implementation: class.name(),
                kind: class.kind(),
            });
        }

        if let Some(existing) = self.definitions.get(&requested) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(DiError::DuplicateDefinition(requested.display_name()));
                }
                DuplicatePolicy::Replace => {
                    tracing::warn!(
                        bean = requested.display_name(),
                        previous = existing.implementation().display_name(),
                        replacement = class.name(),
                        "overwriting existing bean definition"
                    );
                }
            }
        }

        let definition = BeanDefinition {
            requested,
            class: Arc::new(class),
            adapter,
        };
        self.definitions.insert(requested, definition);
        Ok(())
    }

    #[inline]
    pub(crate) fn lookup(&self, requested: &Key) -> Option<&BeanDefinition> {
        self.definitions.get(requested)
    }

    #[inline]
    pub(crate) fn contains(&self, requested: &Key) -> bool {
        self.definitions.contains_key(requested)
    }

    /// All definitions in insertion order.
    pub(crate) fn definitions(&self) -> impl Iterator<Item = &BeanDefinition> {
        self.definitions.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}
