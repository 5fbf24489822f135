//! The container facade.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ContainerConfig;
use crate::descriptors::{BeanClass, BeanDescriptor};
use crate::error::{DiError, DiResult};
use crate::factory::BeanFactory;
use crate::key::Key;
use crate::observer::ContainerObserver;
use crate::registration::{erase, unerase, Adapter, AnyArc, Registry};
use crate::traits::Injectable;
use crate::validation::{self, ValidationReport};

/// Inversion-of-control container holding bean definitions and their singletons.
///
/// Definitions are added with [`register`](Self::register) and
/// [`register_as`](Self::register_as). Beans are built on first
/// [`get_bean`](Self::get_bean), or all at once with
/// [`refresh`](Self::refresh), and then cached for the container's lifetime.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync`. One lock guards the definitions, the
/// singleton cache and the creation stack, and every call holds it for the
/// whole resolution walk, so each bean is constructed at most once even under
/// concurrent access. Constructors run under that lock and must not call back
/// into the container.
///
/// # Examples
///
/// ```
/// use mini_ioc::{BeanClass, Container, Injectable};
/// use std::sync::Arc;
///
/// struct Repository;
/// impl Injectable for Repository {
///     fn bean_class() -> BeanClass {
///         BeanClass::concrete::<Self>().constructor(|| Repository).build()
///     }
/// }
///
/// struct Service { repo: Arc<Repository> }
/// impl Injectable for Service {
///     fn bean_class() -> BeanClass {
///         BeanClass::concrete::<Self>()
///             .constructor(|repo: Arc<Repository>| Service { repo })
///             .build()
///     }
/// }
///
/// let container = Container::new();
/// container.register::<Repository>().unwrap();
/// container.register::<Service>().unwrap();
///
/// let service = container.get_bean::<Service>().unwrap();
/// let repo = container.get_bean::<Repository>().unwrap();
/// assert!(Arc::ptr_eq(&service.repo, &repo));
/// ```
pub struct Container {
    state: Mutex<ContainerState>,
    config: ContainerConfig,
}

struct ContainerState {
    registry: Registry,
    factory: BeanFactory,
}

impl Container {
    /// Creates an empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container. A `max_depth` of zero is raised to one.
    pub fn with_config(config: ContainerConfig) -> Self {
        let config = ContainerConfig {
            max_depth: config.max_depth.max(1),
            ..config
        };
        let state = ContainerState {
            registry: Registry::new(config.duplicate_policy),
            factory: BeanFactory::new(config.max_depth),
        };
        Self {
            state: Mutex::new(state),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ----- Registration -----

    /// Registers `T` as its own implementation.
    ///
    /// Fails with [`DiError::NotConcrete`] if `T` describes itself as an
    /// interface or abstract type; the container is left unchanged.
    ///
    /// Re-registering a type follows the configured
    /// [`DuplicatePolicy`](crate::DuplicatePolicy). Replacing a definition
    /// whose singleton is already cached does not evict that singleton.
    pub fn register<T>(&self) -> DiResult<&Self>
    where
        T: ?Sized + Injectable,
    {
        self.register_class(checked_class::<T>()?)
    }

    /// Registers a class description as its own implementation.
    ///
    /// This is the untyped form of [`register`](Self::register), for classes
    /// assembled at runtime. The bean is requested by the class's own type.
    pub fn register_class(&self, class: BeanClass) -> DiResult<&Self> {
        let requested = class.key();
        self.state.lock().registry.register(requested, class, None)?;
        Ok(self)
    }

    /// Registers `I` as the implementation of the requested type `R`.
    ///
    /// `upcast` turns the built `Arc<I>` into an `Arc<R>`; for trait objects
    /// this is a plain `as` cast. Each requested type gets its own singleton,
    /// even when several share an implementation.
    ///
    /// ```
    /// use mini_ioc::{BeanClass, Container, Injectable};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn value(&self) -> &'static str;
    /// }
    ///
    /// struct GreeterImpl;
    /// impl Greeter for GreeterImpl {
    ///     fn value(&self) -> &'static str { "impl" }
    /// }
    /// impl Injectable for GreeterImpl {
    ///     fn bean_class() -> BeanClass {
    ///         BeanClass::concrete::<Self>().constructor(|| GreeterImpl).build()
    ///     }
    /// }
    ///
    /// let container = Container::new();
    /// container
    ///     .register_as::<dyn Greeter, GreeterImpl, _>(|greeter| greeter as Arc<dyn Greeter>)
    ///     .unwrap();
    ///
    /// assert_eq!(container.get_bean::<dyn Greeter>().unwrap().value(), "impl");
    /// ```
    pub fn register_as<R, I, F>(&self, upcast: F) -> DiResult<&Self>
    where
        R: ?Sized + Send + Sync + 'static,
        I: ?Sized + Injectable,
        F: Fn(Arc<I>) -> Arc<R> + Send + Sync + 'static,
    {
        let class = checked_class::<I>()?;
        let adapter: Adapter = Arc::new(move |instance: AnyArc| {
            let implementation = unerase::<I>(&instance)?;
            Ok(erase(upcast(implementation)))
        });
        self.state
            .lock()
            .registry
            .register(Key::of::<R>(), class, Some(adapter))?;
        Ok(self)
    }

    // ----- Resolution -----

    /// Returns the singleton for `T`, building it on first access.
    ///
    /// Dependencies are resolved recursively through the constructor chosen by
    /// [`select_constructor`](crate::select_constructor). A failed build
    /// caches nothing, so a later call tries again.
    pub fn get_bean<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = {
            let state = self.state.lock();
            state.factory.get_bean(&state.registry, Key::of::<T>())?
        };
        unerase::<T>(&instance)
    }

    /// Eagerly builds every registered bean in registration order.
    ///
    /// Stops at the first failure and returns it; beans built before the
    /// failure stay cached.
    pub fn refresh(&self) -> DiResult<()> {
        let state = self.state.lock();
        for definition in state.registry.definitions() {
            state.factory.get_bean(&state.registry, definition.requested)?;
        }
        Ok(())
    }

    // ----- Introspection -----

    /// Whether `T` has a definition.
    pub fn contains_bean<T: ?Sized + 'static>(&self) -> bool {
        self.state.lock().registry.contains(&Key::of::<T>())
    }

    /// Whether the singleton for `T` has already been built.
    pub fn is_resolved<T: ?Sized + 'static>(&self) -> bool {
        self.state.lock().factory.cached(&Key::of::<T>()).is_some()
    }

    /// Number of registered definitions.
    pub fn bean_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Number of singletons built so far.
    pub fn resolved_count(&self) -> usize {
        self.state.lock().factory.instance_count()
    }

    /// Snapshot of every definition in registration order.
    pub fn definitions(&self) -> Vec<BeanDescriptor> {
        let state = self.state.lock();
        state
            .registry
            .definitions()
            .map(|definition| BeanDescriptor {
                requested: definition.requested,
                implementation: definition.implementation(),
                constructor_count: definition.class.constructors().len(),
                resolved: state.factory.cached(&definition.requested).is_some(),
            })
            .collect()
    }

    /// Checks the registered graph without constructing anything.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.state.lock().registry)
    }

    /// Adds an observer notified of every bean construction.
    pub fn add_observer(&self, observer: Arc<dyn ContainerObserver>) -> &Self {
        self.state.lock().factory.add_observer(observer);
        self
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Container")
            .field("definitions", &state.registry.len())
            .field("resolved", &state.factory.instance_count())
            .field("config", &self.config)
            .finish()
    }
}

/// The class `T` reports, which must describe `T` itself.
fn checked_class<T: ?Sized + Injectable>() -> DiResult<BeanClass> {
    let class = T::bean_class();
    if class.key() != Key::of::<T>() {
        return Err(DiError::TypeMismatch(std::any::type_name::<T>()));
    }
    Ok(class)
}
