//! Macros for declaring registry identities.
//!
//! Each invocation declares a unit struct used as the registry's identity, and
//! implements [`RegistryTag`](crate::RegistryTag) for it over a lazily built
//! `static` registry. The struct also gets associated functions mirroring the
//! registry API, so call sites read `Codecs::create_object("gzip")`.

/// Declares a factory registry identity for a base type.
///
/// ```text
/// define_registry!(vis Tag, BaseType);
/// define_registry!(vis Tag, BaseType, DuplicatePolicy);
/// ```
///
/// The registry name shown in diagnostics is the tag's path, e.g.
/// `my_crate::codecs::Codecs`, so same-named tags in different modules stay
/// distinguishable. The policy defaults to [`DuplicatePolicy::Reject`](crate::DuplicatePolicy).
///
/// # Examples
///
/// ```rust
/// use class_registry::define_registry;
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
/// define_registry!(Codecs, dyn Codec);
///
/// Codecs::add_class("gzip", new_gzip).unwrap();
///
/// assert_eq!(Codecs::class_count(), 1);
/// assert_eq!(&*Codecs::class_name(0).unwrap(), "gzip");
/// assert_eq!(Codecs::create_object("gzip").unwrap().name(), "gzip");
/// assert!(Codecs::create_object("zstd").is_none());
/// ```
///
/// # Multiple Registries
///
/// Registries over the same base type are isolated from each other:
///
/// ```rust
/// use class_registry::define_registry;
///
/// define_registry!(Readers, str);
/// define_registry!(Writers, str);
///
/// Readers::add_class("plain", || Box::from("reader")).unwrap();
///
/// assert!(Readers::contains("plain"));
/// assert!(!Writers::contains("plain"));
/// ```
#[macro_export]
macro_rules! define_registry {
    ($vis:vis $tag:ident, $base:ty) => {
        $crate::define_registry!($vis $tag, $base, $crate::DuplicatePolicy::Reject);
    };
    ($vis:vis $tag:ident, $base:ty, $policy:expr) => {
        /// Identity of a class registry.
        $vis struct $tag;

        impl $crate::RegistryTag for $tag {
            type Registry = $crate::ClassRegistry<$base>;

            fn storage() -> &'static ::std::sync::LazyLock<Self::Registry> {
                static STORAGE: ::std::sync::LazyLock<$crate::ClassRegistry<$base>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::ClassRegistry::with_policy(
                            ::std::concat!(::std::module_path!(), "::", ::std::stringify!($tag)),
                            $policy,
                        )
                    });
                &STORAGE
            }
        }

        #[allow(dead_code)]
        impl $tag {
            /// The process-wide registry, built on first access.
            $vis fn registry() -> &'static $crate::ClassRegistry<$base> {
                $crate::instance::<Self>()
            }

            /// Register a creation function under `name`.
            $vis fn add_class(
                name: &str,
                creator: impl Fn() -> Box<$base> + Send + Sync + 'static,
            ) -> ::std::result::Result<(), $crate::RegistryError> {
                Self::registry().add_class(name, creator)
            }

            /// Create a new object of the class registered under `name`.
            $vis fn create_object(name: &str) -> ::std::option::Option<Box<$base>> {
                Self::registry().create_object(name)
            }

            $crate::__registry_introspection!($vis);
        }
    };
}

/// Declares a singleton registry identity for a base type.
///
/// Same forms as [`define_registry!`]. The base type must be `Sync`, since its
/// instances are shared for the rest of the process.
///
/// # Examples
///
/// ```rust
/// use class_registry::define_singleton_registry;
///
/// trait Service: Sync {
///     fn id(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct Mailer;
/// impl Service for Mailer {
///     fn id(&self) -> &'static str { "mailer" }
/// }
///
/// fn mailer() -> Box<dyn Service> {
///     Box::new(Mailer::default())
/// }
///
/// define_singleton_registry!(Services, dyn Service);
///
/// Services::add_class("mailer", mailer).unwrap();
///
/// let a = Services::get_singleton("mailer").unwrap();
/// let b = Services::get_singleton("mailer").unwrap();
/// assert!(std::ptr::addr_eq(a, b));
/// assert_eq!(a.id(), "mailer");
/// ```
#[macro_export]
macro_rules! define_singleton_registry {
    ($vis:vis $tag:ident, $base:ty) => {
        $crate::define_singleton_registry!($vis $tag, $base, $crate::DuplicatePolicy::Reject);
    };
    ($vis:vis $tag:ident, $base:ty, $policy:expr) => {
        /// Identity of a singleton registry.
        $vis struct $tag;

        impl $crate::RegistryTag for $tag {
            type Registry = $crate::SingletonRegistry<$base>;

            fn storage() -> &'static ::std::sync::LazyLock<Self::Registry> {
                static STORAGE: ::std::sync::LazyLock<$crate::SingletonRegistry<$base>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::SingletonRegistry::with_policy(
                            ::std::concat!(::std::module_path!(), "::", ::std::stringify!($tag)),
                            $policy,
                        )
                    });
                &STORAGE
            }
        }

        #[allow(dead_code)]
        impl $tag {
            /// The process-wide registry, built on first access.
            $vis fn registry() -> &'static $crate::SingletonRegistry<$base> {
                $crate::instance::<Self>()
            }

            /// Register the constructor of the singleton named `name`.
            $vis fn add_class(
                name: &str,
                create: impl Fn() -> Box<$base> + Send + Sync + 'static,
            ) -> ::std::result::Result<(), $crate::RegistryError> {
                Self::registry().add_class(name, create)
            }

            /// The shared instance registered under `name`, built on first use.
            $vis fn get_singleton(name: &str) -> ::std::option::Option<&'static $base> {
                Self::registry().get_singleton(name)
            }

            $vis fn is_constructed(name: &str) -> bool {
                Self::registry().is_constructed(name)
            }

            $crate::__registry_introspection!($vis);
        }
    };
}

/// Associated functions shared by both registry macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __registry_introspection {
    ($vis:vis) => {
        /// Number of registered classes.
        $vis fn class_count() -> usize {
            $crate::Registry::class_count(Self::registry())
        }

        /// Name of the class registered at `index`, in registration order.
        $vis fn class_name(
            index: usize,
        ) -> ::std::result::Result<::std::sync::Arc<str>, $crate::RegistryError> {
            $crate::Registry::class_name(Self::registry(), index)
        }

        /// All registered names, in registration order.
        $vis fn class_names() -> ::std::vec::Vec<::std::sync::Arc<str>> {
            $crate::Registry::class_names(Self::registry())
        }

        $vis fn contains(name: &str) -> bool {
            $crate::Registry::contains(Self::registry(), name)
        }

        /// Set a tracing callback for this registry's operations.
        $vis fn set_trace_callback(
            callback: impl Fn(&$crate::RegistryEvent<'_>) + Send + Sync + 'static,
        ) {
            $crate::Registry::set_trace_callback(Self::registry(), callback)
        }

        /// Clear the tracing callback.
        $vis fn clear_trace_callback() {
            $crate::Registry::clear_trace_callback(Self::registry())
        }
    };
}

/// Registers a default-constructed class under a name, failing fast on collision.
///
/// ```text
/// register_class!(Tag, "name", Class);
/// ```
///
/// Expands to a [`ClassRegisterer`](crate::ClassRegisterer) whose creation
/// function returns `Box::new(Class::default())` as the registry's base type,
/// so implementations need not write their own constructor function.
///
/// # Examples
///
/// ```rust
/// use class_registry::{define_registry, register_class};
///
/// trait Codec {
///     fn name(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct Gzip;
/// impl Codec for Gzip {
///     fn name(&self) -> &'static str { "gzip" }
/// }
///
/// define_registry!(Codecs, dyn Codec);
///
/// let registerer = register_class!(Codecs, "gzip", Gzip);
///
/// assert_eq!(registerer.name(), "gzip");
/// assert_eq!(Codecs::create_object("gzip").unwrap().name(), "gzip");
/// ```
#[macro_export]
macro_rules! register_class {
    ($tag:ty, $name:expr, $class:ty) => {{
        fn create() -> ::std::boxed::Box<$crate::BaseOf<$tag>> {
            ::std::boxed::Box::new(<$class as ::std::default::Default>::default())
        }
        $crate::ClassRegisterer::<$tag>::new($name, create)
    }};
}
