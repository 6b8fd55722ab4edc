//! Logger singleton example for lazy-singleton-registry.
//!
//! Demonstrates:
//! - A one-method capability trait (`Logger`) implemented by a singleton
//! - Publishing the singleton under the trait object type
//! - Tracing registry operations with a callback
//!
//! Run with: `cargo run --example logger_singleton`

use lazy_singleton_registry::{define_registry, Singleton};
use std::convert::Infallible;
use std::sync::Arc;

define_registry!(services);

/// Capability interface: anything that can produce a search link.
trait Logger: Send + Sync {
    fn search_link(&self) -> String;
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn search_link(&self) -> String {
        String::new()
    }
}

impl Singleton for ConsoleLogger {
    type Args = ();
    type Error = Infallible;

    fn construct(_: ()) -> Result<Self, Infallible> {
        Ok(ConsoleLogger)
    }
}

type DynLogger = Box<dyn Logger>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_env()?;

    services::set_trace_callback(|event| println!("[registry-trace] {event}"));

    // Concrete singleton through its `Singleton` impl.
    let concrete = services::get_or_create::<ConsoleLogger>(())?;
    let again = services::get_or_create::<ConsoleLogger>(())?;
    println!("same concrete instance: {}", Arc::ptr_eq(&concrete, &again));
    println!("search link: {:?}", concrete.search_link());

    // Interface singleton: callers only know `dyn Logger`.
    let logger: Arc<DynLogger> = services::get_or_init(|| Box::new(ConsoleLogger) as DynLogger);
    println!("search link via interface: {:?}", logger.search_link());

    services::clear_trace_callback();
    Ok(())
}
