//! # Repository
//!
//! Typed records over a [`KeyValueStore`].
//!
//! ## Key Scheme
//!
//! | Key | Value |
//! |-----|-------|
//! | `assessmentData` | JSON [`crate::AssessmentResult`] |
//! | `metricsData` | JSON [`crate::MetricsSnapshot`] |
//! | `phase{N}Progress` | JSON `{"completed":c,"total":t}` |
//! | `phase{N}_{itemId}` | literal `true` / `false` |
//!
//! Reads never fail: a store error or a malformed value is logged and
//! reported as absent, so callers fall back to their default state.

use crate::storage::KeyValueStore;
use crate::{Phase, RoadmapError};
use serde::Serialize;
use serde::de::DeserializeOwned;

// =============================================================================
// KEYS
// =============================================================================

/// A key in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    AssessmentData,
    MetricsData,
    PhaseProgress(Phase),
    PhaseItem(Phase, &'a str),
}

impl std::fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::AssessmentData => f.write_str("assessmentData"),
            StorageKey::MetricsData => f.write_str("metricsData"),
            StorageKey::PhaseProgress(phase) => write!(f, "phase{}Progress", phase.number()),
            StorageKey::PhaseItem(phase, item_id) => {
                write!(f, "phase{}_{}", phase.number(), item_id)
            }
        }
    }
}

// =============================================================================
// ERROR LOGGING HELPERS
// =============================================================================

/// Log a storage error and convert Result to Option.
///
/// Reads are treated as cache misses on failure; the warning keeps the
/// failure visible.
fn log_and_convert<T>(result: Result<T, RoadmapError>, key: &StorageKey<'_>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "stored value ignored");
            None
        }
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// Typed access to a [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn read(&self, key: &StorageKey<'_>) -> Option<String> {
        log_and_convert(self.store.get(&key.to_string()), key).flatten()
    }

    /// Load a JSON record. Missing or malformed values give `None`.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey<'_>) -> Option<T> {
        let raw = self.read(&key)?;
        let parsed = serde_json::from_str(&raw)
            .map_err(|e| RoadmapError::DeserializationError(e.to_string()));
        log_and_convert(parsed, &key)
    }

    /// Save a JSON record, replacing any previous value.
    pub fn save<T: Serialize>(&mut self, key: StorageKey<'_>, record: &T) -> Result<(), RoadmapError> {
        let raw = serde_json::to_string(record)
            .map_err(|e| RoadmapError::SerializationError(e.to_string()))?;
        self.store.set(&key.to_string(), &raw)
    }

    /// Load a boolean flag stored as `"true"` / `"false"`.
    ///
    /// Anything other than `"true"` reads as `false`.
    pub fn load_flag(&self, key: StorageKey<'_>) -> bool {
        match self.read(&key).as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                tracing::warn!(key = %key, value = other, "malformed flag read as false");
                false
            }
        }
    }

    /// Save a boolean flag.
    pub fn save_flag(&mut self, key: StorageKey<'_>, value: bool) -> Result<(), RoadmapError> {
        self.store
            .set(&key.to_string(), if value { "true" } else { "false" })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        value: u32,
    }

    /// A store whose reads always fail.
    struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, RoadmapError> {
            Err(RoadmapError::StorageError("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), RoadmapError> {
            Err(RoadmapError::StorageError("quota exceeded".to_string()))
        }
    }

    #[test]
    fn key_scheme() {
        assert_eq!(StorageKey::AssessmentData.to_string(), "assessmentData");
        assert_eq!(StorageKey::MetricsData.to_string(), "metricsData");
        assert_eq!(
            StorageKey::PhaseProgress(Phase::Three).to_string(),
            "phase3Progress"
        );
        assert_eq!(
            StorageKey::PhaseItem(Phase::Four, "billing_audit").to_string(),
            "phase4_billing_audit"
        );
    }

    #[test]
    fn record_save_then_load() {
        let mut repo = Repository::new(MemoryStore::new());
        repo.save(StorageKey::MetricsData, &Record { value: 7 })
            .expect("save");
        let loaded: Option<Record> = repo.load(StorageKey::MetricsData);
        assert_eq!(loaded, Some(Record { value: 7 }));
    }

    #[test]
    fn malformed_record_is_absent() {
        let mut store = MemoryStore::new();
        store.set("metricsData", "{not json").expect("set");
        let repo = Repository::new(store);
        let loaded: Option<Record> = repo.load(StorageKey::MetricsData);
        assert_eq!(loaded, None);
    }

    #[test]
    fn flags_are_literal_strings() {
        let mut repo = Repository::new(MemoryStore::new());
        let key = StorageKey::PhaseItem(Phase::One, "sops");
        assert!(!repo.load_flag(key));

        repo.save_flag(key, true).expect("save");
        assert_eq!(
            repo.store().get("phase1_sops").expect("get").as_deref(),
            Some("true")
        );
        assert!(repo.load_flag(key));
    }

    #[test]
    fn malformed_flag_reads_false() {
        let mut store = MemoryStore::new();
        store.set("phase2_icp", "yes").expect("set");
        let repo = Repository::new(store);
        assert!(!repo.load_flag(StorageKey::PhaseItem(Phase::Two, "icp")));
    }

    #[test]
    fn unavailable_store_reads_as_absent() {
        let mut repo = Repository::new(UnavailableStore);
        let loaded: Option<Record> = repo.load(StorageKey::AssessmentData);
        assert_eq!(loaded, None);
        assert!(!repo.load_flag(StorageKey::PhaseItem(Phase::One, "psa")));
        assert!(repo.save_flag(StorageKey::PhaseItem(Phase::One, "psa"), true).is_err());
    }
}
