//! The introspection capability the container relies on.

use crate::descriptors::BeanClass;

/// A type the container knows how to describe.
///
/// `bean_class` reports whether the type is concrete and, if so, which
/// constructors it offers. This is the explicit replacement for runtime
/// reflection: the container never inspects a type beyond what its
/// `BeanClass` declares.
///
/// Concrete structs return a [`BeanClass::concrete`] description with one or
/// more constructors. Trait objects and abstract marker types can implement
/// it too; registering them as an implementation is rejected.
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{BeanClass, Container, Injectable, DiError};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// impl Injectable for dyn Greeter {
///     fn bean_class() -> BeanClass {
///         BeanClass::interface::<Self>()
///     }
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// impl Injectable for English {
///     fn bean_class() -> BeanClass {
///         BeanClass::concrete::<Self>().constructor(|| English).build()
///     }
/// }
///
/// let container = Container::new();
/// assert!(matches!(
///     container.register::<dyn Greeter>(),
///     Err(DiError::NotConcrete { .. })
/// ));
///
/// container
///     .register_as::<dyn Greeter, English, _>(|english| english as Arc<dyn Greeter>)
///     .unwrap();
/// assert_eq!(container.get_bean::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
pub trait Injectable: Send + Sync + 'static {
    /// Describes this type's kind and constructors.
    fn bean_class() -> BeanClass;
}
