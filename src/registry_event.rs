use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`,
/// and mirrored as `tracing` events at `trace` level.
///
/// # Examples
///
/// ```rust
/// use class_registry::RegistryEvent;
///
/// let event = RegistryEvent::Create { registry: "Codecs", name: "gzip", found: true };
/// assert_eq!(event.to_string(), "create { registry: Codecs, name: gzip, found: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent<'a> {
    /// A class was added under a new name.
    Register {
        registry: &'static str,
        name: &'a str,
    },

    /// An existing name was given a new factory (only under `DuplicatePolicy::Replace`).
    Replace {
        registry: &'static str,
        name: &'a str,
    },

    /// `create_object` was called.
    Create {
        registry: &'static str,
        name: &'a str,
        /// Whether the name was registered
        found: bool,
    },

    /// `get_singleton` was called.
    Singleton {
        registry: &'static str,
        name: &'a str,
        /// Whether the name was registered
        found: bool,
    },
}

impl fmt::Display for RegistryEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Register { registry, name } => {
                write!(f, "register {{ registry: {registry}, name: {name} }}")
            }
            RegistryEvent::Replace { registry, name } => {
                write!(f, "replace {{ registry: {registry}, name: {name} }}")
            }
            RegistryEvent::Create {
                registry,
                name,
                found,
            } => write!(
                f,
                "create {{ registry: {registry}, name: {name}, found: {found} }}"
            ),
            RegistryEvent::Singleton {
                registry,
                name,
                found,
            } => write!(
                f,
                "singleton {{ registry: {registry}, name: {name}, found: {found} }}"
            ),
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// It must be thread-safe because registries are process-wide.
pub type TraceCallback = dyn Fn(&RegistryEvent<'_>) + Send + Sync + 'static;

/// Holds the optional trace callback of one registry.
#[derive(Default)]
pub struct Tracer {
    callback: Mutex<Option<Arc<TraceCallback>>>,
}

impl Tracer {
    pub const fn new() -> Self {
        Self {
            callback: Mutex::new(None),
        }
    }

    pub fn set(&self, callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
        let mut guard = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    pub fn clear(&self) {
        let mut guard = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Emits `event` to `tracing` and to the installed callback, if any.
    ///
    /// The callback runs after the lock is released, so it may call back into
    /// the registry (including replacing the callback itself).
    pub fn emit(&self, event: &RegistryEvent<'_>) {
        tracing::trace!(%event, "registry event");

        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("Tracer")
            .field("callback_installed", &installed)
            .finish()
    }
}
