//! # Lazy Singleton Registry
//!
//! A thread-safe registry holding at most one instance per type. The instance is
//! constructed on first demand and shared as `Arc<T>` from then on.
//!
//! The registry exists to show the Singleton pattern done right under threads: a
//! naive "check, then construct" lets two threads both see an empty slot and both
//! construct. Here the check and the construction form one guarded step per type, so
//! concurrent first requests still construct exactly once.
//!
//! ## Quick Start
//!
//! ```rust
//! use lazy_singleton_registry::{Registry, Singleton};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use std::thread;
//!
//! struct Value(String);
//!
//! impl Singleton for Value {
//!     type Args = &'static str;
//!     type Error = Infallible;
//!
//!     fn construct(args: &'static str) -> Result<Self, Infallible> {
//!         Ok(Value(args.to_string()))
//!     }
//! }
//!
//! let registry = Arc::new(Registry::new());
//!
//! let handles: Vec<_> = ["FOO", "BAR"]
//!     .into_iter()
//!     .map(|arg| {
//!         let registry = Arc::clone(&registry);
//!         thread::spawn(move || registry.get_or_create::<Value>(arg).unwrap())
//!     })
//!     .collect();
//!
//! let values: Vec<Arc<Value>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
//! assert_eq!(values[0].0, values[1].0);
//! ```
//!
//! ## Features
//!
//! - **Exactly-once construction**: per type, even under concurrent first access
//! - **First caller wins**: later arguments are ignored, the instance never changes
//! - **Retryable failures**: a failed or panicking constructor leaves the type empty
//! - **Injectable**: a [`Registry`] is a plain value; [`define_registry!`] declares a
//!   process-wide one
//! - **Tracing support**: optional callback receiving a [`RegistryEvent`] per operation
//!
//! ## Main API
//!
//! - [`Registry::get_or_create`] - get or construct a [`Singleton`] from arguments
//! - [`Registry::get_or_try_init`] / [`Registry::get_or_init`] - get or construct from a closure
//! - [`Registry::get`] - look up without constructing
//! - [`Registry::contains`] - check whether a type is constructed
//! - [`Registry::set_trace_callback`] - observe registry operations

mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod singleton;

pub use registry::{Registry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use singleton::Singleton;
