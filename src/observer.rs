//! Observation hooks for bean construction.
//!
//! Observers see every construction the container performs: when it starts,
//! how long it took, and how it failed. Cache hits are not reported.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer for bean construction events.
///
/// Calls are made synchronously while the container lock is held, so keep
/// implementations lightweight and never call back into the container.
///
/// # Examples
///
/// ```
/// use mini_ioc::{BeanClass, Container, ContainerObserver, Injectable, Key};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<&'static str>>,
/// }
///
/// impl ContainerObserver for Recorder {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.built.lock().unwrap().push(key.display_name());
///     }
/// }
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn bean_class() -> BeanClass {
///         BeanClass::concrete::<Self>().constructor(|| Clock).build()
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new();
/// container.add_observer(recorder.clone());
/// container.register::<Clock>().unwrap();
///
/// container.get_bean::<Clock>().unwrap();
/// container.get_bean::<Clock>().unwrap(); // cache hit, not observed
/// assert_eq!(recorder.built.lock().unwrap().len(), 1);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Construction of the bean for `key` is starting.
    fn resolving(&self, key: &Key);

    /// The bean for `key` was constructed and cached.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Construction of the bean for `key` failed with `error`.
    ///
    /// The error still propagates to the caller afterwards.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Registered observers; free when empty
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that reports construction events through `tracing`.
///
/// Starts and completions are emitted at `DEBUG`, failures at `WARN`. The
/// library never installs a subscriber; the application decides where the
/// events go.
///
/// # Examples
///
/// ```
/// use mini_ioc::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::with_label("app")));
/// ```
pub struct LoggingObserver {
    label: &'static str,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { label: "mini-ioc" }
    }

    /// Tags every event with `container = label`.
    pub fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(container = self.label, bean = key.display_name(), "creating bean");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            container = self.label,
            bean = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "bean created"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(
            container = self.label,
            bean = key.display_name(),
            error = %error,
            "bean creation failed"
        );
    }
}
