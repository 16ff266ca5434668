//! # redb-backed Key-Value Storage
//!
//! A disk-backed [`KeyValueStore`] using the redb embedded database.
//!
//! All keys live in one `kv` table of `&str -> &str`. Every `set` commits its
//! own write transaction, so each toggle or submission is durable on return.

use super::KeyValueStore;
use crate::RoadmapError;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for all entries: key string -> value string
const KV: TableDefinition<&str, &str> = TableDefinition::new("kv");

fn io_err(e: impl std::fmt::Display) -> RoadmapError {
    RoadmapError::StorageError(e.to_string())
}

/// A disk-backed key-value store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RoadmapError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize the table so read transactions never see it missing
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(KV).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, RoadmapError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(KV).map_err(io_err)?;
        Ok(table.len().map_err(io_err)? as usize)
    }

    /// All keys in order.
    pub fn keys(&self) -> Result<Vec<String>, RoadmapError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(KV).map_err(io_err)?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (key, _) = entry.map_err(io_err)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, RoadmapError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(KV).map_err(io_err)?;
        Ok(table
            .get(key)
            .map_err(io_err)?
            .map(|v| v.value().to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RoadmapError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(KV).map_err(io_err)?;
            table.insert(key, value).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }
}
