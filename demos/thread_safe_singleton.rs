//! Thread-safe singleton example for lazy-singleton-registry.
//!
//! Two threads request the same singleton with different arguments. Whichever thread
//! gets there first constructs it; the other receives the same instance, so the same
//! value is printed twice: `FOO` twice or `BAR` twice, never one of each.
//!
//! Run with: `cargo run --example thread_safe_singleton`
//! Set `RUST_LOG=debug` to see which thread constructed the instance.

use lazy_singleton_registry::{define_registry, Singleton as SingletonType};
use std::convert::Infallible;
use std::thread;

define_registry!(app);

struct Singleton {
    value: String,
}

impl SingletonType for Singleton {
    type Args = String;
    type Error = Infallible;

    fn construct(value: String) -> Result<Self, Infallible> {
        Ok(Singleton { value })
    }
}

fn test_singleton(value: &str) {
    let singleton = match app::get_or_create::<Singleton>(value.to_string()) {
        Ok(singleton) => singleton,
        Err(never) => match never {},
    };
    println!("{}", singleton.value);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_env()?;

    println!("If you see the same value, then singleton was reused (yay!)");
    println!("If you see different values, then 2 singletons were created (booo!!)\n");
    println!("RESULT:\n");

    let process1 = thread::spawn(|| test_singleton("FOO"));
    let process2 = thread::spawn(|| test_singleton("BAR"));

    process1.join().map_err(|_| "thread FOO panicked")?;
    process2.join().map_err(|_| "thread BAR panicked")?;

    Ok(())
}
