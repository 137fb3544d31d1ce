//! Singleton registry: every lookup of a name yields the same lazily built instance.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, RwLock};

use crate::entry_store::{DuplicatePolicy, EntryStore, ErasedEntry};
use crate::{Creator, Registry, RegistryError, RegistryEvent, Tracer};

/// One registered singleton: its creation function and, once built, the instance.
struct SingletonSlot<T: ?Sized + 'static> {
    create: Creator<T>,
    instance: OnceLock<&'static T>,
}

impl<T: ?Sized + Sync + 'static> SingletonSlot<T> {
    fn get_or_create(&self, registry: &'static str, name: &str) -> &'static T {
        *self.instance.get_or_init(|| {
            tracing::debug!(registry, class = name, "constructing singleton");
            // Lives for the rest of the process, like the registry itself.
            let instance: &'static T = Box::leak((self.create)());
            instance
        })
    }
}

/// Maps names to process-wide instances of the base type `T`, built on first use.
///
/// Each name's instance is constructed exactly once, on the first
/// [`get_singleton`](Self::get_singleton) for it, even when several threads race
/// on that first call. The instance is never dropped.
///
/// # Examples
///
/// ```rust
/// use class_registry::SingletonRegistry;
///
/// trait Clock: Sync {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 7 }
/// }
///
/// fn fixed_clock() -> Box<dyn Clock> {
///     Box::new(FixedClock)
/// }
///
/// let clocks: SingletonRegistry<dyn Clock> = SingletonRegistry::new("clocks");
/// clocks.add_class("fixed", fixed_clock).unwrap();
///
/// let a = clocks.get_singleton("fixed").unwrap();
/// let b = clocks.get_singleton("fixed").unwrap();
/// assert!(std::ptr::addr_eq(a, b));
/// assert_eq!(a.now(), 7);
/// ```
pub struct SingletonRegistry<T: ?Sized> {
    store: RwLock<EntryStore>,
    tracer: Tracer,
    _base: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + Sync + 'static> SingletonRegistry<T> {
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

    /// Registers the constructor of the singleton named `name`.
    ///
    /// Nothing is built until the first [`get_singleton`](Self::get_singleton).
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateClass`] if `name` is taken and duplicates are rejected.
    pub fn add_class(
        &self,
        name: &str,
        create: impl Fn() -> Box<T> + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        self.register(name, Box::new(create))
    }

    /// Returns the shared instance registered under `name`, building it on first use.
    ///
    /// Returns `None` if nothing is registered under `name`. The reference is
    /// valid for the rest of the process.
    pub fn get_singleton(&self, name: &str) -> Option<&'static T> {
        let registry = self.name();
        let slot = self.entry::<SingletonSlot<T>>(name);

        self.tracer.emit(&RegistryEvent::Singleton {
            registry,
            name,
            found: slot.is_some(),
        });

        // The store lock is already released, so a constructor may itself use registries.
        slot.map(|slot| slot.get_or_create(registry, name))
    }

    /// Whether the singleton for `name` has been built yet.
    pub fn is_constructed(&self, name: &str) -> bool {
        self.entry::<SingletonSlot<T>>(name)
            .is_some_and(|slot| slot.instance.get().is_some())
    }
}

impl<T: ?Sized + Sync + 'static> Registry for SingletonRegistry<T> {
    type Base = T;

    fn store(&self) -> &RwLock<EntryStore> {
        &self.store
    }

    fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    fn erase(create: Creator<T>) -> ErasedEntry {
        Arc::new(SingletonSlot {
            create,
            instance: OnceLock::new(),
        })
    }
}

impl<T: ?Sized + Sync + 'static> fmt::Debug for SingletonRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("store", &*self.read_store())
            .field("tracer", &self.tracer)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
