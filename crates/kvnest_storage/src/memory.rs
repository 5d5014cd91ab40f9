//! In-memory storage backend for testing.

use crate::backend::KvBackend;
use crate::error::{StorageError, StorageResult};
use crate::names::{in_subtree, is_system};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type Tables = HashMap<String, BTreeMap<String, Vec<u8>>>;

/// An in-memory storage backend.
///
/// This backend stores all data in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// One coarse read/write lock guards every table. Reads share it,
/// mutations take it exclusively. `close` drops all data; the backend is
/// unusable afterwards.
///
/// # Example
///
/// ```rust
/// use kvnest_storage::{InMemoryBackend, KvBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.set("users", "alice", b"\x00data").unwrap();
/// assert_eq!(backend.count_keys("users").unwrap(), 1);
/// assert_eq!(backend.get("users", "bob").unwrap(), None);
/// ```
#[derive(Debug)]
pub struct InMemoryBackend {
    tables: RwLock<Option<Tables>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Some(HashMap::new())),
        }
    }
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> StorageResult<R> {
        let guard = self.tables.read();
        guard.as_ref().map(f).ok_or(StorageError::Closed)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> StorageResult<R> {
        let mut guard = self.tables.write();
        guard.as_mut().map(f).ok_or(StorageError::Closed)
    }
}

impl KvBackend for InMemoryBackend {
    fn tables(&self) -> StorageResult<Vec<String>> {
        self.read(|tables| {
            let mut names: Vec<String> = tables
                .keys()
                .filter(|name| !is_system(name))
                .cloned()
                .collect();
            names.sort();
            names
        })
    }

    fn count_keys(&self, table: &str) -> StorageResult<usize> {
        self.read(|tables| tables.get(table).map_or(0, BTreeMap::len))
    }

    fn keys(&self, table: &str) -> StorageResult<Vec<String>> {
        self.read(|tables| {
            tables
                .get(table)
                .map(|entries| entries.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn get(&self, table: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.read(|tables| tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    fn set(&self, table: &str, key: &str, value: &[u8]) -> StorageResult<()> {
        self.write(|tables| {
            tables
                .entry(table.to_string())
                .or_default()
                .insert(key.to_string(), value.to_vec());
        })
    }

    fn unset(&self, table: &str, key: &str) -> StorageResult<()> {
        self.write(|tables| {
            if let Some(entries) = tables.get_mut(table) {
                entries.remove(key);
            }
        })
    }

    fn unset_many(&self, table: &str, keys: &[String]) -> StorageResult<usize> {
        self.write(|tables| {
            tables.get_mut(table).map_or(0, |entries| {
                keys.iter()
                    .filter(|key| entries.remove(key.as_str()).is_some())
                    .count()
            })
        })
    }

    fn drop_table(&self, table: &str) -> StorageResult<()> {
        self.write(|tables| tables.retain(|name, _| !in_subtree(name, table)))
    }

    fn close(&self) -> StorageResult<()> {
        // Dropping the map discards all data
        self.tables.write().take();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
