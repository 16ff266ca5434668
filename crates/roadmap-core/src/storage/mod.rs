//! # Storage
//!
//! String-keyed, string-valued stores behind the [`KeyValueStore`] trait.
//!
//! - [`MemoryStore`]: volatile `BTreeMap`, used by tests and embedders.
//! - [`RedbStore`]: disk-backed store on a redb database file.
//!
//! The core depends only on the trait. Record encoding and the key scheme live
//! in [`crate::repository`].

mod redb_store;

pub use redb_store::RedbStore;

use crate::RoadmapError;
use std::collections::BTreeMap;

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, RoadmapError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), RoadmapError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, RoadmapError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RoadmapError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "v1").expect("set");
        store.set("k", "v2").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }
}
