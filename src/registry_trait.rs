//! Core trait defining registry behavior.
//!
//! This module provides the [`Registry`] trait with default implementations for
//! registration, introspection and tracing. Concrete registries only supply
//! access to their [`EntryStore`] and [`Tracer`], and say how a creation
//! function is wrapped into an erased entry.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::entry_store::{EntryStore, ErasedEntry, Insertion};
use crate::{RegistryError, RegistryEvent, Tracer};

/// A creation function producing a new boxed `T`.
pub type Creator<T> = Box<dyn Fn() -> Box<T> + Send + Sync + 'static>;

/// Core trait defining registry behavior.
///
/// Names are unique within one registry and enumerate in registration order.
/// Registration is meant to finish during start-up; lookups afterwards only
/// take a shared read lock.
pub trait Registry: Send + Sync + 'static {
    /// The base type every registered class is handed out as, usually `dyn Trait`.
    type Base: ?Sized + 'static;

    // -------------------------------------------------------------------------------------------------
    // Required accessors
    // -------------------------------------------------------------------------------------------------

    /// Access the entry store.
    ///
    /// Implementation detail of the default methods. Entries must only be
    /// inserted through [`register`](Self::register), which erases them with
    /// [`erase`](Self::erase).
    #[doc(hidden)]
    fn store(&self) -> &RwLock<EntryStore>;

    /// Access the trace callback holder.
    #[doc(hidden)]
    fn tracer(&self) -> &Tracer;

    /// Wrap a creation function into the entry kind this registry stores.
    #[doc(hidden)]
    fn erase(creator: Creator<Self::Base>) -> ErasedEntry;

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Register `creator` under `name`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateClass`] if `name` is already registered and the
    /// registry was built with `DuplicatePolicy::Reject`.
    fn register(&self, name: &str, creator: Creator<Self::Base>) -> Result<(), RegistryError> {
        let registry = self.name();
        let inserted = self
            .store()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Self::erase(creator))?;

        match inserted {
            Insertion::Added => {
                tracing::debug!(registry, class = name, "registered class");
                self.tracer()
                    .emit(&RegistryEvent::Register { registry, name });
            }
            Insertion::Replaced => {
                tracing::warn!(registry, class = name, "replaced registered class");
                self.tracer()
                    .emit(&RegistryEvent::Replace { registry, name });
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------------------------------

    /// Name of this registry, as used in diagnostics.
    fn name(&self) -> &'static str {
        self.read_store().registry()
    }

    /// Number of registered classes.
    fn class_count(&self) -> usize {
        self.read_store().len()
    }

    fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }

    /// Name of the class registered at `index`, in registration order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::IndexOutOfRange`] if `index >= self.class_count()`.
    fn class_name(&self, index: usize) -> Result<Arc<str>, RegistryError> {
        self.read_store().name_at(index).cloned()
    }

    /// All registered names, in registration order.
    fn class_names(&self) -> Vec<Arc<str>> {
        self.read_store().names().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.read_store().contains(name)
    }

    /// Fetch the entry for `name`, downcast to the registry's own entry type.
    ///
    /// The store lock is released before this returns, so callers may run the
    /// factory while other threads read the registry.
    #[doc(hidden)]
    fn entry<E: Any + Send + Sync>(&self, name: &str) -> Option<Arc<E>> {
        let entry = self.read_store().lookup(name)?.clone();
        match entry.downcast::<E>() {
            Ok(entry) => Some(entry),
            Err(_) => {
                tracing::error!(
                    registry = self.name(),
                    class = name,
                    expected = std::any::type_name::<E>(),
                    "registered entry has an unexpected type"
                );
                None
            }
        }
    }

    #[doc(hidden)]
    fn read_store(&self) -> RwLockReadGuard<'_, EntryStore> {
        self.store().read().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked without any registry lock held.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
        self.tracer().set(callback);
    }

    /// Clear the tracing callback.
    fn clear_trace_callback(&self) {
        self.tracer().clear();
    }
}
