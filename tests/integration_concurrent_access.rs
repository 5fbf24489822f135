/// Concurrent access integration tests
///
/// These tests verify that a shared container builds every singleton exactly
/// once and hands the same instance to every thread.

use crossbeam_utils::thread;
use mini_ioc::{BeanClass, Container, Injectable};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

// ===== Test Services =====

static SLOW_BUILDS: AtomicU32 = AtomicU32::new(0);

struct SlowResource {
    created_by: String,
}

impl Injectable for SlowResource {
    fn bean_class() -> BeanClass {
        BeanClass::concrete::<Self>()
            .constructor(|| {
                SLOW_BUILDS.fetch_add(1, Ordering::SeqCst);
                // Widen the race window
                std::thread::sleep(Duration::from_millis(20));
                SlowResource {
                    created_by: format!("{:?}", std::thread::current().id()),
                }
            })
            .build()
    }
}

static HANDLER_BUILDS: AtomicU32 = AtomicU32::new(0);

struct RequestHandler {
    resource: Arc<SlowResource>,
    served: AtomicU32,
}

impl RequestHandler {
    fn handle(&self) -> u32 {
        self.served.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Injectable for RequestHandler {
    fn bean_class() -> BeanClass {
        BeanClass::concrete::<Self>()
            .constructor(|resource: Arc<SlowResource>| {
                HANDLER_BUILDS.fetch_add(1, Ordering::SeqCst);
                RequestHandler {
                    resource,
                    served: AtomicU32::new(0),
                }
            })
            .build()
    }
}

#[test]
fn test_concurrent_singleton_constructed_once() {
    const THREADS: usize = 16;

    let container = Container::new();
    container.register::<SlowResource>().unwrap();
    container.register::<RequestHandler>().unwrap();

    let barrier = Barrier::new(THREADS);
    let handlers: Vec<Arc<RequestHandler>> = thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    let handler = container.get_bean::<RequestHandler>().unwrap();
                    handler.handle();
                    handler
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(SLOW_BUILDS.load(Ordering::SeqCst), 1);
    assert_eq!(HANDLER_BUILDS.load(Ordering::SeqCst), 1);

    let first = &handlers[0];
    for handler in &handlers {
        assert!(Arc::ptr_eq(first, handler));
        assert!(Arc::ptr_eq(&first.resource, &handler.resource));
    }
    assert_eq!(first.served.load(Ordering::SeqCst), THREADS as u32);
    assert!(first.resource.created_by.starts_with("ThreadId"));
}

#[test]
fn test_concurrent_registration_and_lookup() {
    struct Alpha;
    struct Beta;

    impl Injectable for Alpha {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>().constructor(|| Alpha).build()
        }
    }
    impl Injectable for Beta {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>().constructor(|| Beta).build()
        }
    }

    let container = Container::new();
    container.register::<Alpha>().unwrap();

    thread::scope(|s| {
        s.spawn(|_| {
            for _ in 0..100 {
                container.register::<Beta>().unwrap();
            }
        });
        s.spawn(|_| {
            for _ in 0..100 {
                assert!(container.get_bean::<Alpha>().is_ok());
            }
        });
    })
    .unwrap();

    assert_eq!(container.bean_count(), 2);
    assert!(container.get_bean::<Beta>().is_ok());
}

#[test]
fn test_container_shared_through_arc() {
    struct Counter(AtomicU32);

    impl Injectable for Counter {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>()
                .constructor(|| Counter(AtomicU32::new(0)))
                .build()
        }
    }

    let container = Arc::new(Container::new());
    container.register::<Counter>().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    container.get_bean::<Counter>().unwrap().0.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(container.get_bean::<Counter>().unwrap().0.load(Ordering::SeqCst), 400);
}
