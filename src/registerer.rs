//! Explicit, run-once class registration.
//!
//! Implementation modules do not register themselves from static constructors.
//! Each module instead exposes a registration function that builds one
//! [`ClassRegisterer`] per class, and wraps it in a [`Registrar`] so that
//! start-up code can run it deterministically, exactly once.
//!
//! ```rust
//! use class_registry::{define_registry, register_all, ClassRegisterer, Registrar};
//!
//! pub trait Codec: Send {
//!     fn name(&self) -> &'static str;
//! }
//!
//! define_registry!(pub Codecs, dyn Codec);
//!
//! mod gzip {
//!     use super::*;
//!
//!     struct Gzip;
//!     impl Codec for Gzip {
//!         fn name(&self) -> &'static str { "gzip" }
//!     }
//!
//!     fn create() -> Box<dyn Codec> {
//!         Box::new(Gzip)
//!     }
//!
//!     pub static REGISTRAR: Registrar = Registrar::new("gzip", || {
//!         ClassRegisterer::<Codecs>::new("gzip", create);
//!     });
//! }
//!
//! fn main() {
//!     register_all(&[&gzip::REGISTRAR]);
//!     register_all(&[&gzip::REGISTRAR]); // already done, no duplicate
//!
//!     assert_eq!(Codecs::class_count(), 1);
//!     assert_eq!(Codecs::create_object("gzip").unwrap().name(), "gzip");
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Once;

use crate::{instance, Registry, RegistryError, RegistryTag};

/// The base type of the registry selected by the tag `R`.
pub type BaseOf<R> = <<R as RegistryTag>::Registry as Registry>::Base;

/// Proof that one class was registered into the registry selected by `R`.
///
/// Constructing it performs the registration.
pub struct ClassRegisterer<R: RegistryTag> {
    name: &'static str,
    _tag: PhantomData<fn() -> R>,
}

impl<R: RegistryTag> ClassRegisterer<R> {
    /// Registers `creator` under `name`.
    ///
    /// # Panics
    ///
    /// If `name` is already registered and the registry rejects duplicates.
    /// A collision is a build defect, so start-up is aborted with the
    /// registry and class name in the message.
    pub fn new(
        name: &'static str,
        creator: impl Fn() -> Box<BaseOf<R>> + Send + Sync + 'static,
    ) -> Self {
        match Self::try_new(name, creator) {
            Ok(registerer) => registerer,
            Err(err) => {
                tracing::error!(%err, "class registration failed");
                panic!("{err}");
            }
        }
    }

    /// Registers `creator` under `name`, reporting a collision instead of panicking.
    pub fn try_new(
        name: &'static str,
        creator: impl Fn() -> Box<BaseOf<R>> + Send + Sync + 'static,
    ) -> Result<Self, RegistryError> {
        instance::<R>().register(name, Box::new(creator))?;
        Ok(Self {
            name,
            _tag: PhantomData,
        })
    }

    /// The name the class was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<R: RegistryTag> fmt::Debug for ClassRegisterer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegisterer")
            .field("registry", &instance::<R>().name())
            .field("name", &self.name)
            .finish()
    }
}

/// A module's registration step, run at most once per process.
pub struct Registrar {
    module: &'static str,
    register: fn(),
    once: Once,
}

impl Registrar {
    pub const fn new(module: &'static str, register: fn()) -> Self {
        Self {
            module,
            register,
            once: Once::new(),
        }
    }

    /// Runs the registration step unless it already ran.
    ///
    /// Concurrent callers block until the first one finishes.
    ///
    /// # Panics
    ///
    /// If the registration step panics, e.g. on a name collision in
    /// [`ClassRegisterer::new`]. The step is not retried: every later call
    /// panics with a message naming this registrar's module.
    pub fn ensure(&self) {
        self.once.call_once_force(|state| {
            if state.is_poisoned() {
                tracing::error!(module = self.module, "class registrations previously failed");
                panic!(
                    "class registrations for module `{}` previously failed",
                    self.module
                );
            }
            tracing::debug!(module = self.module, "running class registrations");
            (self.register)();
        });
    }

    pub fn is_registered(&self) -> bool {
        self.once.is_completed()
    }

    pub fn module(&self) -> &'static str {
        self.module
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("module", &self.module)
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Runs each registrar in order. Registrars that already ran are skipped.
pub fn register_all(registrars: &[&Registrar]) {
    for registrar in registrars {
        registrar.ensure();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::LazyLock;

    use crate::ClassRegistry;

    struct Numbers;

    impl RegistryTag for Numbers {
        type Registry = ClassRegistry<u32>;

        fn storage() -> &'static LazyLock<ClassRegistry<u32>> {
            static STORAGE: LazyLock<ClassRegistry<u32>> =
                LazyLock::new(|| ClassRegistry::new("Numbers"));
            &STORAGE
        }
    }

    fn one() -> Box<u32> {
        Box::new(1)
    }

    #[test]
    fn test_registerer_registers() {
        let registerer = ClassRegisterer::<Numbers>::new("one", one);
        assert_eq!(registerer.name(), "one");
        assert!(instance::<Numbers>().contains("one"));
        assert_eq!(instance::<Numbers>().create_object("one").as_deref(), Some(&1));

        assert!(format!("{registerer:?}").contains("Numbers"));
    }

    #[test]
    fn test_try_new_reports_collision() {
        ClassRegisterer::<Numbers>::new("two", || Box::new(2));
        let err = ClassRegisterer::<Numbers>::try_new("two", || Box::new(22)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateClass {
                registry: "Numbers",
                name: "two".to_string()
            }
        );
        assert_eq!(instance::<Numbers>().create_object("two").as_deref(), Some(&2));
    }

    #[test]
    #[should_panic(expected = "class `three` is already registered in registry `Numbers`")]
    fn test_new_panics_on_collision() {
        ClassRegisterer::<Numbers>::new("three", || Box::new(3));
        ClassRegisterer::<Numbers>::new("three", || Box::new(3));
    }

    #[test]
    fn test_registrar_runs_once() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        static REGISTRAR: Registrar = Registrar::new("counting", || {
            RUNS.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!REGISTRAR.is_registered());
        register_all(&[&REGISTRAR, &REGISTRAR]);
        REGISTRAR.ensure();

        assert!(REGISTRAR.is_registered());
        assert_eq!(RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(REGISTRAR.module(), "counting");
    }

    #[test]
    fn test_registrar_concurrent_ensure() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        static REGISTRAR: Registrar = Registrar::new("racing", || {
            RUNS.fetch_add(1, Ordering::SeqCst);
            ClassRegisterer::<Numbers>::new("raced", || Box::new(7));
        });

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| REGISTRAR.ensure()))
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(RUNS.load(Ordering::SeqCst), 1);
        assert!(instance::<Numbers>().contains("raced"));
    }

    fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
        match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => payload
                .downcast::<&'static str>()
                .map(|message| message.to_string())
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_failed_registrar_names_its_module() {
        static COLLIDING: Registrar = Registrar::new("colliding", || {
            ClassRegisterer::<Numbers>::new("clash", || Box::new(1));
            ClassRegisterer::<Numbers>::new("clash", || Box::new(2));
        });

        let first = std::panic::catch_unwind(|| COLLIDING.ensure()).unwrap_err();
        assert_eq!(
            panic_message(first),
            "class `clash` is already registered in registry `Numbers`"
        );
        assert!(!COLLIDING.is_registered());

        let again = std::panic::catch_unwind(|| register_all(&[&COLLIDING])).unwrap_err();
        assert_eq!(
            panic_message(again),
            "class registrations for module `colliding` previously failed"
        );
        assert!(!COLLIDING.is_registered());

        // The class registered before the collision stays available.
        assert_eq!(instance::<Numbers>().create_object("clash").as_deref(), Some(&1));
    }

    #[test]
    fn test_register_all_keeps_order() {
        struct Ordered;

        impl RegistryTag for Ordered {
            type Registry = ClassRegistry<u32>;

            fn storage() -> &'static LazyLock<ClassRegistry<u32>> {
                static STORAGE: LazyLock<ClassRegistry<u32>> =
                    LazyLock::new(|| ClassRegistry::new("Ordered"));
                &STORAGE
            }
        }

        static FIRST: Registrar = Registrar::new("first", || {
            ClassRegisterer::<Ordered>::new("a", || Box::new(1));
        });
        static SECOND: Registrar = Registrar::new("second", || {
            ClassRegisterer::<Ordered>::new("b", || Box::new(2));
            ClassRegisterer::<Ordered>::new("c", || Box::new(3));
        });

        register_all(&[&SECOND, &FIRST]);

        let names: Vec<String> = instance::<Ordered>()
            .class_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, ["b", "c", "a"]);
    }
}
