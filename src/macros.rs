//! Macros for declaring process-wide singleton registries.

/// Declares a named, process-wide singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A lazily created `Registry` static (hidden)
/// - Free functions delegating to it
/// - `registry()` returning the `&'static Registry` itself
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
/// use std::sync::Arc;
///
/// // Create a global registry
/// define_registry!(global);
///
/// let first: Arc<String> = global::get_or_init(|| "FOO".to_string());
/// let second: Arc<String> = global::get_or_init(|| "BAR".to_string());
///
/// assert_eq!(&**second, "FOO");
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
///
/// # Multiple Registries
///
/// Each invocation is isolated:
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::get_or_init(|| "db_connection".to_string());
///
/// assert!(database::contains::<String>());
/// assert!(!cache::contains::<String>());
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            static REGISTRY: LazyLock<$crate::Registry> = LazyLock::new($crate::Registry::new);

            /// The process-wide registry behind this module.
            pub fn registry() -> &'static $crate::Registry {
                &REGISTRY
            }

            /// Get the instance of `T`, constructing it from `args` on first request.
            pub fn get_or_create<T: $crate::Singleton>(args: T::Args) -> Result<Arc<T>, T::Error> {
                REGISTRY.get_or_create::<T>(args)
            }

            /// Get the instance of `T`, constructing it with `init` on first request.
            pub fn get_or_try_init<T, E, F>(init: F) -> Result<Arc<T>, E>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> Result<T, E>,
            {
                REGISTRY.get_or_try_init(init)
            }

            /// Infallible form of `get_or_try_init`.
            pub fn get_or_init<T, F>(init: F) -> Arc<T>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> T,
            {
                REGISTRY.get_or_init(init)
            }

            /// Retrieve the instance of `T` without constructing it.
            pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, $crate::RegistryError> {
                REGISTRY.get::<T>()
            }

            /// Check whether an instance of `T` has been constructed.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                REGISTRY.contains::<T>()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
