//! Factory registry: every lookup builds a new object.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use crate::entry_store::{DuplicatePolicy, EntryStore, ErasedEntry};
use crate::{Creator, Registry, RegistryError, RegistryEvent, Tracer};

/// Maps names to creation functions for the base type `T`.
///
/// `T` is typically a trait object, so that independently written
/// implementations can be created by name without the caller naming them.
///
/// # Examples
///
/// ```rust
/// use class_registry::{ClassRegistry, Registry};
///
/// trait Codec {
///     fn name(&self) -> &'static str;
/// }
///
/// struct Gzip;
/// impl Codec for Gzip {
///     fn name(&self) -> &'static str { "gzip" }
/// }
///
/// fn new_gzip() -> Box<dyn Codec> {
///     Box::new(Gzip)
/// }
///
/// let codecs: ClassRegistry<dyn Codec> = ClassRegistry::new("codecs");
/// codecs.add_class("gzip", new_gzip).unwrap();
///
/// assert_eq!(codecs.create_object("gzip").unwrap().name(), "gzip");
/// assert!(codecs.create_object("zstd").is_none());
/// assert_eq!(codecs.class_count(), 1);
/// ```
pub struct ClassRegistry<T: ?Sized> {
    store: RwLock<EntryStore>,
    tracer: Tracer,
    _base: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + 'static> ClassRegistry<T> {
    /// Creates an empty registry that rejects duplicate names.
    pub fn new(name: &'static str) -> Self {
        Self::with_policy(name, DuplicatePolicy::default())
    }

    pub fn with_policy(name: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            store: RwLock::new(EntryStore::with_policy(name, policy)),
            tracer: Tracer::new(),
            _base: PhantomData,
        }
    }

    /// Registers `creator` under `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateClass`] if `name` is taken and duplicates are rejected.
    pub fn add_class(
        &self,
        name: &str,
        creator: impl Fn() -> Box<T> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        self.register(name, Box::new(creator))
    }

    /// Builds a new instance of the class registered under `name`.
    ///
    /// Returns `None` if nothing is registered under `name`. The caller owns the
    /// returned object.
    pub fn create_object(&self, name: &str) -> Option<Box<T>> {
        let creator = self.entry::<Creator<T>>(name);

        self.tracer.emit(&RegistryEvent::Create {
            registry: self.name(),
            name,
            found: creator.is_some(),
        });

        creator.map(|create| create())
    }
}

impl<T: ?Sized + 'static> Registry for ClassRegistry<T> {
    type Base = T;

    fn store(&self) -> &RwLock<EntryStore> {
        &self.store
    }

    fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    fn erase(creator: Creator<T>) -> ErasedEntry {
        Arc::new(creator)
    }
}

impl<T: ?Sized + 'static> fmt::Debug for ClassRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("store", &*self.read_store())
            .field("tracer", &self.tracer)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
