//! Integration tests for registry isolation and multiple registries.
//!
//! Registries declared with different identities never share names, even when
//! they are built over the same base type.

use class_registry::{
    define_registry, define_singleton_registry, instance, Registry, RegistryError,
};

pub trait Store: Send + Sync {
    fn url(&self) -> &'static str;
}

struct Postgres;
impl Store for Postgres {
    fn url(&self) -> &'static str {
        "postgresql://localhost"
    }
}

struct Redis;
impl Store for Redis {
    fn url(&self) -> &'static str {
        "redis://localhost"
    }
}

fn postgres() -> Box<dyn Store> {
    Box::new(Postgres)
}

fn redis() -> Box<dyn Store> {
    Box::new(Redis)
}

#[test]
fn test_multiple_isolated_registries() {
    define_registry!(Databases, dyn Store);
    define_registry!(Caches, dyn Store);
    define_registry!(Fallbacks, dyn Store);

    Databases::add_class("primary", postgres).unwrap();
    Caches::add_class("primary", redis).unwrap();

    assert_eq!(
        Databases::create_object("primary").unwrap().url(),
        "postgresql://localhost"
    );
    assert_eq!(
        Caches::create_object("primary").unwrap().url(),
        "redis://localhost"
    );
    assert!(Fallbacks::create_object("primary").is_none());
    assert_eq!(Fallbacks::class_count(), 0);
}

#[test]
fn test_registry_does_not_leak_between_identities() {
    define_registry!(IsolatedA, dyn Store);
    define_registry!(IsolatedB, dyn Store);

    IsolatedA::add_class("only_in_a", postgres).unwrap();

    assert!(IsolatedA::contains("only_in_a"));
    assert!(!IsolatedB::contains("only_in_a"));
    assert!(IsolatedB::create_object("only_in_a").is_none());
    assert_eq!(IsolatedA::class_count(), 1);
    assert_eq!(IsolatedB::class_count(), 0);
}

#[test]
fn test_same_name_in_both_variants() {
    define_registry!(Factories, dyn Store);
    define_singleton_registry!(Shared, dyn Store);

    Factories::add_class("store", postgres).unwrap();
    Shared::add_class("store", redis).unwrap();

    assert_eq!(Factories::create_object("store").unwrap().url(), "postgresql://localhost");
    assert_eq!(Shared::get_singleton("store").unwrap().url(), "redis://localhost");
}

#[test]
fn test_registry_names_follow_tags() {
    define_registry!(Named, dyn Store);

    assert_eq!(Named::registry().name(), "registry_isolation::Named");
    assert_eq!(instance::<Named>().name(), "registry_isolation::Named");
    assert!(std::ptr::eq(Named::registry(), instance::<Named>()));
}

#[test]
fn test_registry_scoping() {
    mod module_a {
        use super::*;
        define_registry!(pub Scoped, dyn Store);

        pub fn setup() {
            Scoped::add_class("store", postgres).unwrap();
        }

        pub fn url() -> &'static str {
            Scoped::create_object("store").unwrap().url()
        }
    }

    mod module_b {
        use super::*;
        define_registry!(pub Scoped, dyn Store);

        pub fn setup() {
            Scoped::add_class("store", redis).unwrap();
        }

        pub fn url() -> &'static str {
            Scoped::create_object("store").unwrap().url()
        }
    }

    // Same tag name, different modules: two registries
    module_a::setup();
    module_b::setup();

    assert_eq!(module_a::url(), "postgresql://localhost");
    assert_eq!(module_b::url(), "redis://localhost");
}

mod primary {
    use super::*;
    define_registry!(pub Dup, dyn Store);
}

mod replica {
    use super::*;
    define_singleton_registry!(pub Dup, dyn Store);
}

#[test]
fn test_same_named_tags_report_distinct_registries() {
    primary::Dup::add_class("x", postgres).unwrap();
    replica::Dup::add_class("x", redis).unwrap();

    let primary_err = primary::Dup::add_class("x", redis).unwrap_err();
    let replica_err = replica::Dup::add_class("x", postgres).unwrap_err();

    assert_eq!(
        primary_err,
        RegistryError::DuplicateClass {
            registry: "registry_isolation::primary::Dup",
            name: "x".to_string()
        }
    );
    assert_eq!(
        replica_err,
        RegistryError::DuplicateClass {
            registry: "registry_isolation::replica::Dup",
            name: "x".to_string()
        }
    );
    assert_ne!(primary_err.to_string(), replica_err.to_string());
}

#[test]
fn test_registry_with_tracing_isolation() {
    define_registry!(TracedA, dyn Store);
    define_registry!(TracedB, dyn Store);

    let events = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let events_clone = events.clone();

    TracedA::set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });

    TracedA::add_class("a", postgres).unwrap();
    TracedB::add_class("b", redis).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0], "register { registry: registry_isolation::TracedA, name: a }");
}
