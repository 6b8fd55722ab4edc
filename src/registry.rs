//! The lazy singleton registry.
//!
//! A [`Registry`] maps each type (`TypeId`) to at most one shared instance. The instance
//! is constructed on the first request for its type and then handed out as `Arc<T>` to
//! every caller for the lifetime of the registry.
//!
//! Construction is guarded by double-checked locking with one guard per type:
//!
//! 1. The slot map lock is taken just long enough to find (or insert) the type's slot.
//! 2. An initialized slot is returned straight away.
//! 3. Otherwise the slot's own guard is taken, the slot is checked again, and the
//!    constructor runs only if it is still empty.
//!
//! Concurrent first requests for one type therefore construct exactly one instance,
//! while first requests for different types construct in parallel.
//!
//! # Examples
//!
//! ```
//! use lazy_singleton_registry::Registry;
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//!
//! let first: Arc<String> = registry.get_or_init(|| "FOO".to_string());
//! let second: Arc<String> = registry.get_or_init(|| "BAR".to_string());
//!
//! // The first caller wins, later arguments are ignored.
//! assert_eq!(&*second, "FOO");
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use once_cell::sync::OnceCell;

use crate::{RegistryError, RegistryEvent, Singleton};

/// Per-type slot. Empty until the first successful construction, then never changes.
type Slot<T> = OnceCell<Arc<T>>;

/// Type-erased slot. Always an `Arc<Slot<T>>` for the `T` whose `TypeId` is its key.
type ErasedSlot = Arc<dyn Any + Send + Sync>;

/// Map entry: the erased slot plus a probe monomorphized for its `T`.
struct Entry {
    slot: ErasedSlot,
    is_initialized: fn(&ErasedSlot) -> bool,
}

impl Entry {
    fn new<T: Send + Sync + 'static>() -> Self {
        Self {
            slot: Arc::new(Slot::<T>::new()),
            is_initialized: slot_is_initialized::<T>,
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because the registry itself is shared.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Thread-safe registry holding one lazily constructed instance per type.
///
/// A `Registry` is an ordinary value: create one per test, share one through an `Arc`,
/// or declare a process-wide one with [`define_registry!`](crate::define_registry).
#[derive(Default)]
pub struct Registry {
    slots: Mutex<HashMap<TypeId, Entry>>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry interaction.
    ///
    /// Replaces any previous callback. The callback runs after the registry has released
    /// its locks, so it may call back into this registry.
    ///
    /// # Example
    /// ```rust
    /// use lazy_singleton_registry::Registry;
    ///
    /// let registry = Registry::new();
    /// registry.set_trace_callback(|event| println!("[registry-trace] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            callback(event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Slots
    // ---------------------------------------------------------------------------------------------

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<TypeId, Entry>> {
        // The map is only ever mutated by inserting an empty slot, so a poisoned guard
        // still protects a consistent map.
        self.slots.lock().unwrap_or_else(|poisoned| {
            log::warn!("recovering poisoned singleton registry lock");
            poisoned.into_inner()
        })
    }

    /// Returns the slot for `T`, inserting an empty one on first use.
    fn slot<T: Send + Sync + 'static>(&self) -> Arc<Slot<T>> {
        let erased = self
            .lock_slots()
            .entry(TypeId::of::<T>())
            .or_insert_with(Entry::new::<T>)
            .slot
            .clone();

        match downcast_slot::<T>(erased) {
            Ok(slot) => slot,
            Err(err) => unreachable!("{err}"),
        }
    }

    /// Returns the slot for `T` without inserting one.
    fn existing_slot<T: Send + Sync + 'static>(
        &self,
    ) -> Result<Option<Arc<Slot<T>>>, RegistryError> {
        let erased = self
            .lock_slots()
            .get(&TypeId::of::<T>())
            .map(|entry| entry.slot.clone());
        erased.map(downcast_slot::<T>).transpose()
    }

    // ---------------------------------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------------------------------

    /// Returns the instance of `T`, constructing it with `init` if there is none yet.
    ///
    /// `init` runs at most once per type across all threads, and only when no instance
    /// exists. Every other caller, concurrent or later, receives the same `Arc<T>`; their
    /// `init` closures are dropped without being called.
    ///
    /// # Errors
    ///
    /// The error returned by `init` is handed back to the caller that ran it. The type
    /// stays uninitialized, so a later call may retry construction.
    ///
    /// # Panics
    ///
    /// A panic in `init` propagates to the caller and leaves the type uninitialized.
    ///
    /// `init` must not request `T` from this registry: that blocks forever on the guard
    /// it is running under. Requesting other types is fine.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::Registry;
    ///
    /// let registry = Registry::new();
    ///
    /// let failed = registry.get_or_try_init(|| "not a port".parse::<u16>());
    /// assert!(failed.is_err());
    ///
    /// let port = registry.get_or_try_init(|| "8080".parse::<u16>()).unwrap();
    /// assert_eq!(*port, 8080);
    /// ```
    pub fn get_or_try_init<T, E, F>(&self, init: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let type_name = std::any::type_name::<T>();
        let slot = self.slot::<T>();

        if let Some(instance) = slot.get() {
            log::trace!("reusing singleton {type_name}");
            self.emit_event(&RegistryEvent::Reuse { type_name });
            return Ok(Arc::clone(instance));
        }

        let mut constructed = false;
        let result = slot.get_or_try_init(|| {
            constructed = true;
            init().map(Arc::new)
        });

        match result {
            Ok(instance) => {
                let instance = Arc::clone(instance);
                if constructed {
                    log::debug!("constructed singleton {type_name}");
                    self.emit_event(&RegistryEvent::Construct { type_name });
                } else {
                    // Another thread finished construction while we waited on the guard.
                    log::trace!("reusing singleton {type_name}");
                    self.emit_event(&RegistryEvent::Reuse { type_name });
                }
                Ok(instance)
            }
            Err(err) => {
                log::warn!("construction of singleton {type_name} failed");
                self.emit_event(&RegistryEvent::ConstructFailed { type_name });
                Err(err)
            }
        }
    }

    /// Returns the instance of `T`, constructing it with `init` if there is none yet.
    ///
    /// Infallible form of [`get_or_try_init`](Self::get_or_try_init).
    pub fn get_or_init<T, F>(&self, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(init())) {
            Ok(instance) => instance,
            Err(never) => match never {},
        }
    }

    /// Returns the instance of `T`, constructing it from `args` if there is none yet.
    ///
    /// If `T` is already initialized, `args` is dropped unused and the existing instance
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Singleton::construct`] to the caller that ran it; the type
    /// stays uninitialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazy_singleton_registry::{Registry, Singleton};
    /// use std::convert::Infallible;
    ///
    /// struct Greeting(String);
    ///
    /// impl Singleton for Greeting {
    ///     type Args = &'static str;
    ///     type Error = Infallible;
    ///
    ///     fn construct(args: Self::Args) -> Result<Self, Self::Error> {
    ///         Ok(Greeting(args.to_string()))
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// let a = registry.get_or_create::<Greeting>("FOO").unwrap();
    /// let b = registry.get_or_create::<Greeting>("BAR").unwrap();
    /// assert_eq!(a.0, "FOO");
    /// assert_eq!(b.0, "FOO");
    /// ```
    pub fn get_or_create<T: Singleton>(&self, args: T::Args) -> Result<Arc<T>, T::Error> {
        self.get_or_try_init(|| T::construct(args))
    }

    /// Retrieves the instance of `T` without constructing it.
    ///
    /// # Errors
    ///
    /// - `TypeNotFound` if `T` has not been constructed yet
    /// - `TypeMismatch` if the stored slot does not belong to `T`
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let type_name = std::any::type_name::<T>();

        let result = self.existing_slot::<T>().and_then(|slot| {
            let instance = slot.and_then(|slot| slot.get().cloned());
            instance.ok_or(RegistryError::TypeNotFound { type_name })
        });

        self.emit_event(&RegistryEvent::Get {
            type_name,
            found: result.is_ok(),
        });

        result
    }

    /// Checks whether an instance of `T` has been constructed.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let found = matches!(
            self.existing_slot::<T>(),
            Ok(Some(slot)) if slot.get().is_some()
        );

        self.emit_event(&RegistryEvent::Contains {
            type_name: std::any::type_name::<T>(),
            found,
        });

        found
    }

    /// Number of types with a constructed instance.
    ///
    /// Types whose construction failed and was not retried are not counted.
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|entry| (entry.is_initialized)(&entry.slot))
            .count()
    }

    /// Returns `true` if no instance has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn slot_is_initialized<T: Send + Sync + 'static>(slot: &ErasedSlot) -> bool {
    (**slot)
        .downcast_ref::<Slot<T>>()
        .is_some_and(|slot| slot.get().is_some())
}

fn downcast_slot<T: Send + Sync + 'static>(
    erased: ErasedSlot,
) -> Result<Arc<Slot<T>>, RegistryError> {
    erased
        .downcast::<Slot<T>>()
        .map_err(|_| RegistryError::TypeMismatch {
            type_name: std::any::type_name::<T>(),
        })
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
