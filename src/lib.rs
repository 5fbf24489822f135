//! # mini-ioc
//!
//! A minimal inversion-of-control container: constructor injection with
//! memoized singletons, interface-to-implementation bindings and circular
//! dependency detection.
//!
//! ## Features
//!
//! - **Constructor injection**: dependencies are the parameters of a typed constructor closure
//! - **Singletons**: each requested type is built at most once and then shared as an `Arc`
//! - **Interface bindings**: `dyn Trait` requests resolve to a registered implementation
//! - **Circular dependency detection**: reports the full creation path instead of overflowing the stack
//! - **Deterministic constructor selection**: a single preferred constructor, else the greediest
//! - **Thread-safe**: a shared container builds every bean exactly once
//!
//! ## Quick Start
//!
//! ```rust
//! use mini_ioc::{BeanClass, Container, Injectable};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! impl Injectable for Database {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::concrete::<Self>()
//!             .constructor(|| Database { url: "postgres://localhost".to_string() })
//!             .build()
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::concrete::<Self>()
//!             .constructor(|db: Arc<Database>| UserService { db })
//!             .build()
//!     }
//! }
//!
//! let container = Container::new();
//! container.register::<Database>().unwrap();
//! container.register::<UserService>().unwrap();
//!
//! let users = container.get_bean::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Interface Bindings
//!
//! ```rust
//! use mini_ioc::{BeanClass, Container, Injectable};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn prefix(&self) -> &'static str;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn prefix(&self) -> &'static str { "[LOG]" }
//! }
//!
//! impl Injectable for ConsoleLogger {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::concrete::<Self>().constructor(|| ConsoleLogger).build()
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .register_as::<dyn Logger, ConsoleLogger, _>(|logger| logger as Arc<dyn Logger>)
//!     .unwrap();
//!
//! let logger = container.get_bean::<dyn Logger>().unwrap();
//! assert_eq!(logger.prefix(), "[LOG]");
//! ```
//!
//! ## Circular Dependencies
//!
//! ```rust
//! use mini_ioc::{BeanClass, Container, DiError, Injectable};
//! use std::sync::Arc;
//!
//! struct A(Arc<B>);
//! struct B(Arc<A>);
//!
//! impl Injectable for A {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::concrete::<Self>().constructor(|b: Arc<B>| A(b)).build()
//!     }
//! }
//! impl Injectable for B {
//!     fn bean_class() -> BeanClass {
//!         BeanClass::concrete::<Self>().constructor(|a: Arc<A>| B(a)).build()
//!     }
//! }
//!
//! let container = Container::new();
//! container.register::<A>().unwrap();
//! container.register::<B>().unwrap();
//!
//! match container.get_bean::<A>() {
//!     Err(DiError::Circular { path, .. }) => assert_eq!(path.len(), 3),
//!     _ => unreachable!(),
//! }
//! ```

// Module declarations
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod observer;
pub mod selection;
pub mod traits;
pub mod validation;

// Internal modules
mod factory;
mod internal;
mod registration;

// Re-export core types
pub use config::{ConfigError, ContainerConfig, DuplicatePolicy};
pub use container::Container;
pub use descriptors::{BeanClass, BeanDescriptor, ClassBuilder, ConstructorDescriptor, TypeKind};
pub use error::{CreationFailure, DiError, DiResult, SharedError};
pub use key::{key_of, Key};
pub use observer::{ContainerObserver, LoggingObserver};
pub use registration::AnyArc;
pub use selection::{select_constructor, SelectedConstructor, SelectionReason};
pub use traits::{ConstructorFn, Injectable};
pub use validation::{ValidationIssue, ValidationReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }
    impl Injectable for English {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>().constructor(|| English).build()
        }
    }

    #[test]
    fn test_singleton_resolution() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        struct Counter;
        impl Injectable for Counter {
            fn bean_class() -> BeanClass {
                BeanClass::concrete::<Self>()
                    .constructor(|| {
                        BUILT.fetch_add(1, Ordering::SeqCst);
                        Counter
                    })
                    .build()
            }
        }

        let container = Container::new();
        container.register::<Counter>().unwrap();

        let a = container.get_bean::<Counter>().unwrap();
        let b = container.get_bean::<Counter>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trait_resolution() {
        let container = Container::new();
        container
            .register_as::<dyn Greeter, English, _>(|english| english as Arc<dyn Greeter>)
            .unwrap();

        let greeter = container.get_bean::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
        assert!(!container.contains_bean::<English>());
    }

    #[test]
    fn test_chained_registration() {
        struct Clock;
        impl Injectable for Clock {
            fn bean_class() -> BeanClass {
                BeanClass::concrete::<Self>().constructor(|| Clock).build()
            }
        }

        let container = Container::new();
        container
            .register::<Clock>()
            .unwrap()
            .register::<English>()
            .unwrap();

        assert_eq!(container.bean_count(), 2);
        assert_eq!(container.resolved_count(), 0);
    }

    #[test]
    fn test_debug_output_summarizes_state() {
        let container = Container::new();
        container.register::<English>().unwrap();
        container.get_bean::<English>().unwrap();

        let debug = format!("{:?}", container);
        assert!(debug.contains("definitions: 1"));
        assert!(debug.contains("resolved: 1"));
    }
}
