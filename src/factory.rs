//! The resolution engine: singleton cache, cycle detection and recursive
//! constructor injection.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::descriptors::{BeanClass, ConstructorDescriptor};
use crate::error::{CreationFailure, DiError, DiResult};
use crate::internal::CreationStack;
use crate::key::Key;
use crate::observer::{ContainerObserver, Observers};
use crate::registration::{AnyArc, BeanDefinition, Registry};
use crate::selection::select_constructor;

#[cfg(feature = "ahash")]
type InstanceMap = ahash::AHashMap<Key, AnyArc>;
#[cfg(not(feature = "ahash"))]
type InstanceMap = std::collections::HashMap<Key, AnyArc>;

/// Builds and caches singletons for the definitions of a [`Registry`].
///
/// The factory is not `Sync`; the container serializes access to it.
pub(crate) struct BeanFactory {
    /// Singletons keyed by requested type
    instances: RefCell<InstanceMap>,
    creating: CreationStack,
    observers: Observers,
}

impl BeanFactory {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            instances: RefCell::new(InstanceMap::default()),
            creating: CreationStack::new(max_depth),
            observers: Observers::new(),
        }
    }

    pub(crate) fn add_observer(&mut self, observer: std::sync::Arc<dyn ContainerObserver>) {
        self.observers.add(observer);
    }

    /// Returns the singleton for `requested`, building it and its dependencies
    /// on first access.
    pub(crate) fn get_bean(&self, registry: &Registry, requested: Key) -> DiResult<AnyArc> {
        let definition = registry
            .lookup(&requested)
            .ok_or(DiError::NoSuchDefinition {
                bean: requested.display_name(),
                required_by: None,
            })?;

        if let Some(instance) = self.cached(&requested) {
            return Ok(instance);
        }

        let _guard = self.creating.enter(definition.implementation())?;

        let instance = if self.observers.has_observers() {
            let start = Instant::now();
            self.observers.resolving(&requested);
            let result = self.create_bean(registry, definition);
            match &result {
                Ok(_) => self.observers.resolved(&requested, start.elapsed()),
                Err(error) => self.observers.failed(&requested, error),
            }
            result?
        } else {
            self.create_bean(registry, definition)?
        };

        self.instances.borrow_mut().insert(requested, instance.clone());
        Ok(instance)
    }

    #[inline]
    pub(crate) fn cached(&self, requested: &Key) -> Option<AnyArc> {
        self.instances.borrow().get(requested).cloned()
    }

    pub(crate) fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }

    fn create_bean(&self, registry: &Registry, definition: &BeanDefinition) -> DiResult<AnyArc> {
        let class = &definition.class;
        let selected = select_constructor(class)?;
        let args = self.resolve_dependencies(registry, class, selected.constructor)?;
        build_instance(definition, selected.constructor, &args)
    }

    fn resolve_dependencies(
        &self,
        registry: &Registry,
        class: &BeanClass,
        constructor: &ConstructorDescriptor,
    ) -> DiResult<Vec<AnyArc>> {
        constructor
            .parameters()
            .iter()
            .map(|parameter| {
                self.get_bean(registry, *parameter)
                    .map_err(|error| attribute_missing(error, class.name()))
            })
            .collect()
    }
}

/// Names the class whose constructor asked for a bean nobody defined.
fn attribute_missing(error: DiError, owner: &'static str) -> DiError {
    match error {
        DiError::NoSuchDefinition {
            bean,
            required_by: None,
        } => DiError::NoSuchDefinition {
            bean,
            required_by: Some(owner),
        },
        other => other,
    }
}

/// Runs the constructor and the requested-type adapter under one panic guard.
fn build_instance(
    definition: &BeanDefinition,
    constructor: &ConstructorDescriptor,
    args: &[AnyArc],
) -> DiResult<AnyArc> {
    let build = || constructor.invoke(args).and_then(|instance| definition.adapt(instance));
    match panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(result) => result,
        Err(payload) => Err(DiError::BeanCreation {
            bean: definition.class.name(),
            failure: CreationFailure::Panicked(panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
