//! Integration tests for registry isolation.
//!
//! Every `Registry` value and every `define_registry!` module owns its own instances.
//! One instance per type is a per-registry guarantee.

use lazy_singleton_registry::{define_registry, Registry};
use std::sync::Arc;

#[test]
fn test_multiple_isolated_registries() {
    define_registry!(database);
    define_registry!(cache);
    define_registry!(config);

    database::get_or_init(|| "postgresql://localhost".to_string());
    cache::get_or_init(|| "redis://localhost".to_string());
    config::get_or_init(|| "app_config".to_string());

    let db: Arc<String> = database::get().unwrap();
    let cache_val: Arc<String> = cache::get().unwrap();
    let cfg: Arc<String> = config::get().unwrap();

    assert_eq!(&**db, "postgresql://localhost");
    assert_eq!(&**cache_val, "redis://localhost");
    assert_eq!(&**cfg, "app_config");
}

#[test]
fn test_same_type_different_registries() {
    let reg_a = Registry::new();
    let reg_b = Registry::new();

    let a: Arc<i32> = reg_a.get_or_init(|| 100);
    let b: Arc<i32> = reg_b.get_or_init(|| 200);

    assert_eq!(*a, 100);
    assert_eq!(*b, 200);
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_registry_does_not_leak_between_instances() {
    define_registry!(isolated_a);
    define_registry!(isolated_b);

    isolated_a::get_or_init(|| "only in A".to_string());

    assert!(isolated_a::contains::<String>());
    assert!(!isolated_b::contains::<String>());

    let result: Result<Arc<String>, _> = isolated_b::get();
    assert!(result.is_err());
}

#[test]
fn test_per_type_independence() {
    #[derive(Debug, Default)]
    struct Counter(std::sync::atomic::AtomicU32);

    #[derive(Debug, Default)]
    struct OtherCounter(std::sync::atomic::AtomicU32);

    use std::sync::atomic::Ordering;

    let registry = Registry::new();

    let a = registry.get_or_init(Counter::default);
    let b = registry.get_or_init(OtherCounter::default);

    a.0.fetch_add(5, Ordering::SeqCst);

    assert_eq!(a.0.load(Ordering::SeqCst), 5);
    assert_eq!(b.0.load(Ordering::SeqCst), 0);
    assert_eq!(
        registry.get::<Counter>().unwrap().0.load(Ordering::SeqCst),
        5
    );
}

#[test]
fn test_registry_scoping() {
    mod module_a {
        use lazy_singleton_registry::define_registry;
        define_registry!(scoped);

        pub fn value() -> String {
            scoped::get_or_init(|| "module A".to_string()).to_string()
        }
    }

    mod module_b {
        use lazy_singleton_registry::define_registry;
        define_registry!(scoped);

        pub fn value() -> String {
            scoped::get_or_init(|| "module B".to_string()).to_string()
        }
    }

    assert_eq!(module_a::value(), "module A");
    assert_eq!(module_b::value(), "module B");
}

#[test]
fn test_injected_registry_shared_by_components() {
    struct Settings {
        endpoint: String,
    }

    struct Client {
        registry: Arc<Registry>,
    }

    impl Client {
        fn endpoint(&self) -> String {
            self.registry
                .get_or_init(|| Settings {
                    endpoint: "https://default.example.com".to_string(),
                })
                .endpoint
                .clone()
        }
    }

    let registry = Arc::new(Registry::new());
    registry.get_or_init(|| Settings {
        endpoint: "https://api.example.com".to_string(),
    });

    let first = Client {
        registry: Arc::clone(&registry),
    };
    let second = Client {
        registry: Arc::clone(&registry),
    };

    assert_eq!(first.endpoint(), "https://api.example.com");
    assert_eq!(second.endpoint(), "https://api.example.com");
}
