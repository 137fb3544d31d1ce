//! Registry identities and the process-wide accessor.
//!
//! Each identity is a distinct type implementing [`RegistryTag`]. Two tags over
//! the same base type still own two separate registries, so their namespaces
//! never overlap.

use std::sync::LazyLock;

use crate::Registry;

/// Selects one process-wide registry.
///
/// Implementors only provide access to a `static` `LazyLock` holding the
/// registry; [`define_registry!`](crate::define_registry) and
/// [`define_singleton_registry!`](crate::define_singleton_registry) generate
/// this for you.
///
/// # Examples
///
/// ```rust
/// use class_registry::{instance, ClassRegistry, Registry, RegistryTag};
/// use std::sync::LazyLock;
///
/// struct Numbers;
///
/// impl RegistryTag for Numbers {
///     type Registry = ClassRegistry<u32>;
///
///     fn storage() -> &'static LazyLock<ClassRegistry<u32>> {
///         static STORAGE: LazyLock<ClassRegistry<u32>> =
///             LazyLock::new(|| ClassRegistry::new("Numbers"));
///         &STORAGE
///     }
/// }
///
/// instance::<Numbers>().add_class("one", || Box::new(1)).unwrap();
/// assert_eq!(instance::<Numbers>().class_count(), 1);
/// ```
pub trait RegistryTag: 'static {
    type Registry: Registry;

    /// Access the static holding this identity's registry.
    fn storage() -> &'static LazyLock<Self::Registry>;
}

/// Returns the registry for `R`, constructing it on first call.
///
/// Safe to call from any thread at any point of start-up: the first caller
/// builds the registry, every caller gets the same instance.
pub fn instance<R: RegistryTag>() -> &'static R::Registry {
    LazyLock::force(R::storage())
}
