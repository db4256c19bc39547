//! Keyed registration store.
//!
//! [`Registry`] maps an identifier to one registration record. Registering an
//! existing key replaces the record in place, so a key never appears twice.
//! Iteration follows first-registration order, and [`Registry::keys`] hands
//! out a snapshot so callers can remove entries while walking it.

use std::collections::HashMap;

/// Insertion-ordered map from identifier to registration record.
#[derive(Debug, Clone)]
pub struct Registry<R> {
    entries: HashMap<String, R>,
    order: Vec<String>,
}

impl<R> Registry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register `record` under `key`.
    ///
    /// If the key is already registered the record is replaced and keeps its
    /// position; the previous record is returned.
    pub fn insert(&mut self, key: impl Into<String>, record: R) -> Option<R> {
        let key = key.into();
        match self.entries.insert(key.clone(), record) {
            Some(previous) => Some(previous),
            None => {
                self.order.push(key);
                None
            }
        }
    }

    /// Remove a registration, returning it if it existed.
    pub fn remove(&mut self, key: &str) -> Option<R> {
        let record = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(record)
    }

    /// Look up a registration.
    pub fn get(&self, key: &str) -> Option<&R> {
        self.entries.get(key)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut R> {
        self.entries.get_mut(key)
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot of the registered keys in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Iterate `(key, record)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|r| (k.as_str(), r)))
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
