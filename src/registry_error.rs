/// Errors reported by class registries.
///
/// A name that was never registered is not an error: lookups return `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same name was registered twice into a registry that rejects duplicates.
    #[error("class `{name}` is already registered in registry `{registry}`")]
    DuplicateClass {
        registry: &'static str,
        name: String,
    },

    /// A class index outside `0..class_count()` was requested.
    #[error("class index {index} is out of range for registry `{registry}` ({count} classes)")]
    IndexOutOfRange {
        registry: &'static str,
        index: usize,
        count: usize,
    },
}
