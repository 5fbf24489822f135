//! Class and constructor descriptors, plus definition descriptors for introspection.

use std::error::Error as StdError;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{CreationFailure, DiError, DiResult, SharedError};
use crate::key::Key;
use crate::registration::{erase, AnyArc};
use crate::traits::ConstructorFn;

pub(crate) type Invoker = Arc<dyn Fn(&[AnyArc]) -> DiResult<AnyArc> + Send + Sync>;

/// Whether a type can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Instantiable through its declared constructors
    Concrete,
    /// A trait object; only usable as a requested type
    Interface,
    /// A type that declares itself non-instantiable
    Abstract,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Concrete => f.write_str("concrete"),
            TypeKind::Interface => f.write_str("interface"),
            TypeKind::Abstract => f.write_str("abstract"),
        }
    }
}

/// One public constructor of an implementing type.
///
/// Carries the ordered parameter keys, the "preferred" marker and the
/// declaration index used to break arity ties.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    index: usize,
    parameters: Vec<Key>,
    preferred: bool,
    invoker: Invoker,
}

impl ConstructorDescriptor {
    /// Position of this constructor in declaration order, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Requested types of the parameters, in order.
    pub fn parameters(&self) -> &[Key] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the constructor was declared with the preferred marker.
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    /// Calls the constructor with resolved arguments.
    ///
    /// Failures returned by a fallible constructor come back as
    /// [`DiError::BeanCreation`]; panics are not caught here.
    pub(crate) fn invoke(&self, args: &[AnyArc]) -> DiResult<AnyArc> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("index", &self.index)
            .field("parameters", &self.parameters)
            .field("preferred", &self.preferred)
            .finish()
    }
}

/// Description of an implementing type: its kind and its public constructors.
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{BeanClass, TypeKind};
/// use std::sync::Arc;
///
/// struct Repository;
/// struct Service { repo: Option<Arc<Repository>> }
///
/// let class = BeanClass::concrete::<Service>()
///     .constructor(|| Service { repo: None })
///     .constructor(|repo: Arc<Repository>| Service { repo: Some(repo) })
///     .build();
///
/// assert_eq!(class.kind(), TypeKind::Concrete);
/// assert_eq!(class.constructors().len(), 2);
/// assert_eq!(class.constructors()[1].arity(), 1);
/// ```
#[derive(Clone)]
pub struct BeanClass {
    key: Key,
    kind: TypeKind,
    constructors: Vec<ConstructorDescriptor>,
}

impl BeanClass {
    /// Starts describing the concrete type `T`.
    pub fn concrete<T: Send + Sync + 'static>() -> ClassBuilder<T> {
        ClassBuilder {
            constructors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Describes a trait object. Interfaces have no constructors.
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self::without_constructors(Key::of::<T>(), TypeKind::Interface)
    }

    /// Describes a type that must not be instantiated directly.
    pub fn abstract_type<T: ?Sized + 'static>() -> Self {
        Self::without_constructors(Key::of::<T>(), TypeKind::Abstract)
    }

    fn without_constructors(key: Key, kind: TypeKind) -> Self {
        Self {
            key,
            kind,
            constructors: Vec::new(),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Declared constructors in declaration order.
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("constructors", &self.constructors)
            .finish()
    }
}

/// Typed builder for a concrete [`BeanClass`].
///
/// Each call appends one constructor in declaration order. Constructors are
/// closures taking `Arc<Dependency>` parameters; see [`ConstructorFn`].
pub struct ClassBuilder<T> {
    constructors: Vec<ConstructorDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ClassBuilder<T> {
    /// Adds an infallible constructor.
    pub fn constructor<F, Args>(self, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = T>,
    {
        self.push(false, ctor)
    }

    /// Adds an infallible constructor carrying the preferred marker.
    ///
    /// A preferred constructor wins over greedier unmarked ones.
    pub fn preferred_constructor<F, Args>(self, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = T>,
    {
        self.push(true, ctor)
    }

    /// Adds a constructor that may fail.
    ///
    /// An `Err` is reported as [`DiError::BeanCreation`] with the error kept
    /// as [`CreationFailure::Constructor`].
    pub fn fallible_constructor<F, Args, E>(self, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = Result<T, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.push_fallible(false, ctor)
    }

    /// Adds a fallible constructor carrying the preferred marker.
    pub fn preferred_fallible_constructor<F, Args, E>(self, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = Result<T, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.push_fallible(true, ctor)
    }

    pub fn build(self) -> BeanClass {
        BeanClass {
            key: Key::of::<T>(),
            kind: TypeKind::Concrete,
            constructors: self.constructors,
        }
    }

    fn push<F, Args>(self, preferred: bool, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = T>,
    {
        let invoker: Invoker = Arc::new(move |args: &[AnyArc]| {
            let value = ctor.construct(args)?;
            Ok(erase(Arc::new(value)))
        });
        self.with_descriptor(F::parameters(), preferred, invoker)
    }

    fn push_fallible<F, Args, E>(self, preferred: bool, ctor: F) -> Self
    where
        F: ConstructorFn<Args, Output = Result<T, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let invoker: Invoker = Arc::new(move |args: &[AnyArc]| match ctor.construct(args)? {
            Ok(value) => Ok(erase(Arc::new(value))),
            Err(fault) => {
                let boxed: Box<dyn StdError + Send + Sync> = fault.into();
                let cause: SharedError = Arc::from(boxed);
                Err(DiError::BeanCreation {
                    bean: std::any::type_name::<T>(),
                    failure: CreationFailure::Constructor(cause),
                })
            }
        });
        self.with_descriptor(F::parameters(), preferred, invoker)
    }

    fn with_descriptor(mut self, parameters: Vec<Key>, preferred: bool, invoker: Invoker) -> Self {
        let index = self.constructors.len();
        self.constructors.push(ConstructorDescriptor {
            index,
            parameters,
            preferred,
            invoker,
        });
        self
    }
}

impl<T: Send + Sync + 'static> From<ClassBuilder<T>> for BeanClass {
    fn from(builder: ClassBuilder<T>) -> Self {
        builder.build()
    }
}

/// Snapshot of one bean definition for introspection and diagnostics
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{BeanClass, Container, Injectable};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn bean_class() -> BeanClass {
///         BeanClass::concrete::<Self>().constructor(|| Clock).build()
///     }
/// }
///
/// let container = Container::new();
/// container.register::<Clock>().unwrap();
///
/// let descriptors = container.definitions();
/// assert_eq!(descriptors.len(), 1);
/// assert!(descriptors[0].is_self_binding());
/// assert!(!descriptors[0].resolved);
///
/// container.get_bean::<Clock>().unwrap();
/// assert!(container.definitions()[0].resolved);
/// ```
#[derive(Debug, Clone)]
pub struct BeanDescriptor {
    /// The requested type
    pub requested: Key,
    /// The implementing type
    pub implementation: Key,
    /// Number of public constructors the implementation declares
    pub constructor_count: usize,
    /// Whether a singleton is already cached for the requested type
    pub resolved: bool,
}

impl BeanDescriptor {
    pub fn requested_name(&self) -> &'static str {
        self.requested.display_name()
    }

    pub fn implementation_name(&self) -> &'static str {
        self.implementation.display_name()
    }

    /// Whether the requested type is its own implementation.
    pub fn is_self_binding(&self) -> bool {
        self.requested == self.implementation
    }
}
