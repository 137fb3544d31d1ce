//! # Class Registry
//!
//! Name-keyed registries that let implementation modules register their classes
//! under a string, against a shared base type (usually a trait object), so that
//! callers can later create instances or fetch process-wide singletons purely
//! by name, without depending on the implementing module.
//!
//! Registries are write-mostly during start-up and read-only afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use class_registry::define_registry;
//!
//! pub trait Codec {
//!     fn compress(&self, input: &[u8]) -> Vec<u8>;
//! }
//!
//! struct Identity;
//! impl Codec for Identity {
//!     fn compress(&self, input: &[u8]) -> Vec<u8> { input.to_vec() }
//! }
//!
//! fn identity() -> Box<dyn Codec> {
//!     Box::new(Identity)
//! }
//!
//! define_registry!(pub Codecs, dyn Codec);
//!
//! Codecs::add_class("identity", identity).unwrap();
//!
//! let codec = Codecs::create_object("identity").unwrap();
//! assert_eq!(codec.compress(b"abc"), b"abc");
//! assert!(Codecs::create_object("zstd").is_none());
//! ```
//!
//! ## Features
//!
//! - **Two variants**: [`ClassRegistry`] builds a new object per lookup,
//!   [`SingletonRegistry`] hands out one lazily built instance per name
//! - **Isolated identities**: every [`RegistryTag`] owns its own registry, even over the same base type
//! - **Ordered introspection**: names enumerate in registration order
//! - **Fail-fast duplicates**: a second registration of a name is an error by default ([`DuplicatePolicy`])
//! - **Deterministic start-up**: [`Registrar`] runs a module's registrations exactly once
//! - **Tracing support**: `tracing` events plus an optional per-registry callback
//!
//! ## Main Items
//!
//! - [`define_registry!`] / [`define_singleton_registry!`] - declare a registry identity
//! - [`instance`] - fetch the process-wide registry for an identity
//! - [`ClassRegisterer`] - register one class, failing fast on collisions
//! - [`register_class!`] - register a default-constructed class by type
//! - [`Registrar`] / [`register_all`] - run-once module registration steps
//! - [`Registry`] - introspection and tracing shared by both variants

mod class_registry;
mod entry_store;
mod macros;
mod registerer;
mod registry_error;
mod registry_event;
mod registry_tag;
mod registry_trait;
mod singleton_registry;

pub use class_registry::ClassRegistry;
pub use entry_store::{DuplicatePolicy, EntryStore, ErasedEntry, Insertion};
pub use registerer::{register_all, BaseOf, ClassRegisterer, Registrar};
pub use registry_error::RegistryError;
pub use registry_event::{RegistryEvent, TraceCallback, Tracer};
pub use registry_tag::{instance, RegistryTag};
pub use registry_trait::{Creator, Registry};
pub use singleton_registry::SingletonRegistry;
