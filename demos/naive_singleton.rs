//! Naive singleton example: why the check and the construction must be one step.
//!
//! `NaiveRegistry` checks for an instance under one lock acquisition and inserts under
//! another. Two threads can both see "absent" in between, both construct, and end up
//! holding different instances. The same race run against `Registry` always yields
//! one instance.
//!
//! Run with: `cargo run --example naive_singleton`

use lazy_singleton_registry::Registry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct Value(String);

/// Check-then-insert without holding the lock across both.
#[derive(Default)]
struct NaiveRegistry {
    instance: Mutex<HashMap<&'static str, Arc<Value>>>,
}

impl NaiveRegistry {
    fn get_or_create(&self, value: &str, constructions: &AtomicUsize) -> Arc<Value> {
        if let Some(existing) = self.lock().get("Value") {
            return Arc::clone(existing);
        }

        // Slow construction widens the window between check and insert.
        thread::sleep(Duration::from_millis(50));
        constructions.fetch_add(1, Ordering::SeqCst);
        let created = Arc::new(Value(value.to_string()));

        self.lock().insert("Value", Arc::clone(&created));
        created
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, Arc<Value>>> {
        self.instance.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn run_race<F>(label: &str, get: F)
where
    F: Fn(&str, &AtomicUsize) -> Arc<Value> + Send + Sync + 'static,
{
    let get = Arc::new(get);
    let constructions = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["FOO", "BAR"]
        .into_iter()
        .map(|arg| {
            let get = Arc::clone(&get);
            let constructions = Arc::clone(&constructions);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (*get)(arg, constructions.as_ref())
            })
        })
        .collect();

    println!("{label}:");
    for handle in handles {
        match handle.join() {
            Ok(value) => println!("  {}", value.0),
            Err(_) => println!("  <thread panicked>"),
        }
    }
    println!(
        "  constructions: {}\n",
        constructions.load(Ordering::SeqCst)
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_env()?;

    let naive = Arc::new(NaiveRegistry::default());
    run_race("naive check-then-insert", move |arg, constructions| {
        naive.get_or_create(arg, constructions)
    });

    let guarded = Arc::new(Registry::new());
    run_race("guarded registry", move |arg, constructions| {
        guarded.get_or_init(|| {
            thread::sleep(Duration::from_millis(50));
            constructions.fetch_add(1, Ordering::SeqCst);
            Value(arg.to_string())
        })
    });

    Ok(())
}
