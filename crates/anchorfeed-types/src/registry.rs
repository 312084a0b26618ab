//! Keyed configuration storage.
//!
//! A [`Registry`] is a flat map from an identifier to a configuration
//! record. Whether entries can be changed after insertion is a capability
//! fixed at construction: a registry built immutable rejects updates and
//! removals for its whole lifetime, so a deployment can choose between a
//! frozen asset universe and an administrable one with the same code paths.

use std::collections::BTreeMap;

/// Errors from registry operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An entry already exists under this key.
    #[error("duplicate key")]
    DuplicateKey,

    /// No entry exists under this key.
    #[error("key not found")]
    NotFound,

    /// The registry was built without the mutation capability.
    #[error("registry is immutable")]
    Immutable,
}

/// A keyed store of configuration records.
#[derive(Clone, Debug)]
pub struct Registry<K, V> {
    entries: BTreeMap<K, V>,
    mutable: bool,
}

impl<K: Ord, V> Registry<K, V> {
    /// Create a registry; `mutable` grants update and removal for its lifetime.
    pub fn new(mutable: bool) -> Self {
        Self {
            entries: BTreeMap::new(),
            mutable,
        }
    }

    /// Whether this registry accepts updates and removals.
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Insert a new entry. Insertion is allowed even on immutable
    /// registries; only changing or removing existing entries is gated.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), RegistryError> {
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateKey);
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Look up an entry.
    pub fn get(&self, key: &K) -> Result<&V, RegistryError> {
        self.entries.get(key).ok_or(RegistryError::NotFound)
    }

    /// Look up an entry for in-place modification.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, RegistryError> {
        if !self.mutable {
            return Err(RegistryError::Immutable);
        }
        self.entries.get_mut(key).ok_or(RegistryError::NotFound)
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &K) -> Result<V, RegistryError> {
        if !self.mutable {
            return Err(RegistryError::Immutable);
        }
        self.entries.remove(key).ok_or(RegistryError::NotFound)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}
