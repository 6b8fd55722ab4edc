//! The `Singleton` trait: types that know how to construct their one instance.

use std::sync::Arc;

use crate::Registry;

/// A type with a single shared instance, built from `Args` on first request.
///
/// Implementing `Singleton` gives a type one explicit entry point,
/// [`Registry::get_or_create`], instead of ordinary construction. The arguments of
/// the first successful call decide the instance; arguments passed later are ignored.
///
/// # Examples
///
/// ```
/// use lazy_singleton_registry::{Registry, Singleton};
///
/// #[derive(Debug)]
/// struct Pool {
///     size: usize,
/// }
///
/// impl Singleton for Pool {
///     type Args = usize;
///     type Error = String;
///
///     fn construct(size: usize) -> Result<Self, String> {
///         if size == 0 {
///             return Err("pool size must be positive".into());
///         }
///         Ok(Pool { size })
///     }
/// }
///
/// let registry = Registry::new();
/// assert!(Pool::instance(&registry, 0).is_err());
///
/// let pool = Pool::instance(&registry, 4).unwrap();
/// assert_eq!(pool.size, 4);
/// assert_eq!(Pool::instance(&registry, 16).unwrap().size, 4);
/// ```
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Arguments needed to build the instance.
    type Args;

    /// Error returned when the instance cannot be built from the given arguments.
    type Error;

    /// Builds the instance. Called at most once per successful initialization.
    fn construct(args: Self::Args) -> Result<Self, Self::Error>;

    /// Shorthand for `registry.get_or_create::<Self>(args)`.
    fn instance(registry: &Registry, args: Self::Args) -> Result<Arc<Self>, Self::Error> {
        registry.get_or_create::<Self>(args)
    }
}
