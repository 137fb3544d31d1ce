//! Type-erased storage shared by every registry variant.
//!
//! The store keeps a name -> entry map for lookups and a parallel list of names
//! in registration order for enumeration. Both are only ever changed together
//! inside [`EntryStore::insert`], so a name is present in the list exactly when
//! it is a key of the map.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::RegistryError;

/// An opaque factory. Typed registries downcast it back to their own entry type.
pub type ErasedEntry = Arc<dyn Any + Send + Sync>;

/// What a registry does when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`RegistryError::DuplicateClass`] and keep the first entry.
    #[default]
    Reject,
    /// Overwrite the entry. The name keeps its original position.
    Replace,
}

/// Outcome of a successful [`EntryStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Added,
    Replaced,
}

/// Name-keyed, insertion-ordered store of erased entries for one registry.
pub struct EntryStore {
    registry: &'static str,
    policy: DuplicatePolicy,
    entries: HashMap<Arc<str>, ErasedEntry>,
    names: Vec<Arc<str>>,
}

impl EntryStore {
    pub fn new(registry: &'static str) -> Self {
        Self::with_policy(registry, DuplicatePolicy::default())
    }

    pub fn with_policy(registry: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            registry,
            policy,
            entries: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Name of the registry owning this store, used in diagnostics.
    pub fn registry(&self) -> &'static str {
        self.registry
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Inserts `entry` under `name`.
    ///
    /// A new name is appended to the registration order. An existing name is
    /// handled according to the store's [`DuplicatePolicy`].
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateClass`] if `name` exists and the policy is `Reject`.
    pub fn insert(&mut self, name: &str, entry: ErasedEntry) -> Result<Insertion, RegistryError> {
        if let Some(existing) = self.entries.get_mut(name) {
            return match self.policy {
                DuplicatePolicy::Reject => Err(RegistryError::DuplicateClass {
                    registry: self.registry,
                    name: name.to_string(),
                }),
                DuplicatePolicy::Replace => {
                    *existing = entry;
                    Ok(Insertion::Replaced)
                }
            };
        }

        let key: Arc<str> = Arc::from(name);
        self.entries.insert(key.clone(), entry);
        self.names.push(key);
        Ok(Insertion::Added)
    }

    pub fn lookup(&self, name: &str) -> Option<&ErasedEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the name registered at `index`, counting in registration order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn name_at(&self, index: usize) -> Result<&Arc<str>, RegistryError> {
        self.names
            .get(index)
            .ok_or(RegistryError::IndexOutOfRange {
                registry: self.registry,
                index,
                count: self.names.len(),
            })
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &Arc<str>> + '_ {
        self.names.iter()
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("names", &self.names)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
