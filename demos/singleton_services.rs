//! Singleton services example for class-registry.
//!
//! Demonstrates:
//! - A singleton registry of services, each built on first use
//! - Many threads sharing the one instance per name
//! - Introspection over registered names
//!
//! Run with: `RUST_LOG=debug cargo run --example singleton_services`

use class_registry::define_singleton_registry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use tracing_subscriber::EnvFilter;

/// Contract for a shared service.
trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Hands out increasing ids starting at 1.
#[derive(Default)]
struct Sequential {
    next: AtomicU64,
}

impl IdGenerator for Sequential {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Hands out even ids only.
#[derive(Default)]
struct Even {
    next: AtomicU64,
}

impl IdGenerator for Even {
    fn next_id(&self) -> u64 {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1) * 2
    }
}

fn sequential() -> Box<dyn IdGenerator> {
    Box::new(Sequential::default())
}

fn even() -> Box<dyn IdGenerator> {
    Box::new(Even::default())
}

define_singleton_registry!(Generators, dyn IdGenerator);

fn register_all() {
    for (name, create) in [
        ("sequential", sequential as fn() -> Box<dyn IdGenerator>),
        ("even", even),
    ] {
        if let Err(err) = Generators::add_class(name, create) {
            eprintln!("registration failed: {err}");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== class-registry: Singleton Services ===\n");

    register_all();
    println!("Registered: {:?}", Generators::class_names());

    // -------------------------------------------------------------------------
    // Four threads draw from the same generator.
    // -------------------------------------------------------------------------
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let generator = Generators::get_singleton("sequential")?;
                Some((0..5).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .filter_map(|h| h.join().ok().flatten())
        .flatten()
        .collect();
    ids.sort_unstable();
    println!("sequential ids drawn by 4 threads: {ids:?}");

    // Untouched singletons are never built.
    println!("even constructed yet? {}", Generators::is_constructed("even"));
    if let Some(generator) = Generators::get_singleton("even") {
        println!("even: {}, {}", generator.next_id(), generator.next_id());
    }
    println!("unknown generator: {:?}", Generators::get_singleton("random").map(|g| g.next_id()));

    println!("\n=== Example Complete ===");
}
