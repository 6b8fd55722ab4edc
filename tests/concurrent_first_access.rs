//! Integration tests for concurrent first access.
//!
//! Many threads are lined up on a barrier and released into the registry at once, so
//! they all race on the very first request for the same type.

use lazy_singleton_registry::{define_registry, Registry, Singleton};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Stores whichever argument reached construction first.
#[derive(Debug)]
struct Value(String);

impl Singleton for Value {
    type Args = String;
    type Error = Infallible;

    fn construct(args: String) -> Result<Self, Infallible> {
        Ok(Value(args))
    }
}

/// Spawns one thread per argument, releases them together, and collects the instances.
fn race<T, A>(registry: &Arc<Registry>, args: Vec<A>) -> Vec<Arc<T>>
where
    T: Singleton<Args = A, Error = Infallible>,
    A: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(args.len()));

    let handles: Vec<_> = args
        .into_iter()
        .map(|arg| {
            let registry = Arc::clone(registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match registry.get_or_create::<T>(arg) {
                    Ok(instance) => instance,
                    Err(never) => match never {},
                }
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_foo_bar_threads_observe_same_value() {
    let registry = Arc::new(Registry::new());

    let values = race::<Value, _>(&registry, vec!["FOO".to_string(), "BAR".to_string()]);

    assert_eq!(values[0].0, values[1].0);
    assert!(values[0].0 == "FOO" || values[0].0 == "BAR");
    assert!(Arc::ptr_eq(&values[0], &values[1]));
}

#[test]
fn test_many_threads_share_one_instance() {
    let registry = Arc::new(Registry::new());
    let args: Vec<String> = (0..32).map(|i| format!("arg-{i}")).collect();

    let values = race::<Value, _>(&registry, args.clone());

    assert!(values.iter().all(|v| Arc::ptr_eq(v, &values[0])));
    assert!(args.contains(&values[0].0));
}

static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// Counts how many times it was constructed.
struct Counted;

impl Singleton for Counted {
    type Args = ();
    type Error = Infallible;

    fn construct(_: ()) -> Result<Self, Infallible> {
        CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which other threads are waiting on the guard.
        thread::sleep(std::time::Duration::from_millis(10));
        Ok(Counted)
    }
}

#[test]
fn test_hundred_threads_construct_exactly_once() {
    let registry = Arc::new(Registry::new());

    let instances = race::<Counted, _>(&registry, vec![(); 100]);

    assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    assert_eq!(instances.len(), 100);
    assert!(instances.iter().all(|c| Arc::ptr_eq(c, &instances[0])));
}

#[test]
fn test_distinct_types_race_independently() {
    #[derive(Debug)]
    struct Left(u32);
    #[derive(Debug)]
    struct Right(u32);

    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(2));

    let left = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            registry.get_or_init(|| Left(1))
        })
    };
    let right = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            registry.get_or_init(|| Right(2))
        })
    };

    assert_eq!(left.join().unwrap().0, 1);
    assert_eq!(right.join().unwrap().0, 2);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_process_wide_registry_under_race() {
    define_registry!(process);

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["FOO", "BAR"]
        .into_iter()
        .map(|arg| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                process::get_or_create::<Value>(arg.to_string()).unwrap()
            })
        })
        .collect();

    let values: Vec<Arc<Value>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(values[0].0, values[1].0);
}
