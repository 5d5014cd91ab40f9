//! redb-backed persistent storage backend.
//!
//! Every kvnest table maps one-to-one onto a redb table of type
//! `&str -> &[u8]`, so the flat table space of the engine is the flat table
//! space of the store.
//!
//! # Design
//!
//! - Read transactions for all read operations (concurrent).
//! - One write transaction per `set`, `unset` or `drop_table` (serialised by
//!   redb internally).
//! - `unset` never creates a table: existence is checked inside the write
//!   transaction and the transaction is aborted when there is nothing to do.
//! - `drop_table` removes the whole subtree inside a single transaction.

use crate::backend::KvBackend;
use crate::error::{StorageError, StorageResult};
use crate::names::{in_subtree, is_system};
use parking_lot::RwLock;
use redb::{
    Database, DatabaseError, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, TableError, TableHandle,
};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Options for opening a [`RedbBackend`].
#[derive(Debug, Clone)]
pub struct RedbOptions {
    /// How long to keep retrying while another instance holds the file.
    pub lock_timeout: Duration,
    /// Pause between two lock attempts.
    pub retry_interval: Duration,
    /// Whether to create the file if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for RedbOptions {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(1),
            retry_interval: Duration::from_millis(50),
            create_if_missing: true,
        }
    }
}

fn definition(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// A persistent storage backend powered by redb.
///
/// Holds redb's exclusive lock on the database file for as long as it is
/// open. Data survives process restarts.
///
/// # Example
///
/// ```no_run
/// use kvnest_storage::{KvBackend, RedbBackend};
///
/// let backend = RedbBackend::open("data.kv").unwrap();
/// backend.set("users", "alice", b"\x00payload").unwrap();
/// backend.close().unwrap();
/// ```
pub struct RedbBackend {
    db: RwLock<Option<Database>>,
    path: PathBuf,
}

impl RedbBackend {
    /// Opens or creates a database file with default options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another instance keeps the file
    /// locked for longer than one second.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_options(path, &RedbOptions::default())
    }

    /// Opens or creates a database file.
    ///
    /// Lock contention is retried every `retry_interval` until
    /// `lock_timeout` has elapsed, then reported as
    /// [`StorageError::Locked`]. Other engine failures are returned
    /// immediately.
    pub fn open_with_options(path: impl AsRef<Path>, options: &RedbOptions) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if !options.create_if_missing {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("database file does not exist: {}", path.display()),
                )));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let deadline = Instant::now() + options.lock_timeout;
        let db = loop {
            match Database::create(&path) {
                Ok(db) => break db,
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    if Instant::now() >= deadline {
                        warn!(path = %path.display(), "database file is locked");
                        return Err(StorageError::Locked {
                            path: path.display().to_string(),
                        });
                    }
                    debug!(path = %path.display(), "waiting for database lock");
                    thread::sleep(options.retry_interval);
                }
                Err(e) => return Err(StorageError::engine(e)),
            }
        };

        debug!(path = %path.display(), "opened redb backend");

        Ok(Self {
            db: RwLock::new(Some(db)),
            path,
        })
    }

    /// Returns the filesystem path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_db<R>(&self, f: impl FnOnce(&Database) -> StorageResult<R>) -> StorageResult<R> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        f(db)
    }
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend")
            .field("path", &self.path)
            .field("open", &self.db.read().is_some())
            .finish()
    }
}

impl KvBackend for RedbBackend {
    fn tables(&self) -> StorageResult<Vec<String>> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(StorageError::engine)?;
            let mut names: Vec<String> = txn
                .list_tables()
                .map_err(StorageError::engine)?
                .map(|handle| handle.name().to_string())
                .filter(|name| !is_system(name))
                .collect();
            names.sort();
            Ok(names)
        })
    }

    fn count_keys(&self, table: &str) -> StorageResult<usize> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(StorageError::engine)?;
            let t = match txn.open_table(definition(table)) {
                Ok(t) => t,
                Err(TableError::TableDoesNotExist(_)) => return Ok(0),
                Err(e) => return Err(StorageError::engine(e)),
            };
            let len = t.len().map_err(StorageError::engine)?;
            Ok(len as usize)
        })
    }

    fn keys(&self, table: &str) -> StorageResult<Vec<String>> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(StorageError::engine)?;
            let t = match txn.open_table(definition(table)) {
                Ok(t) => t,
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(e) => return Err(StorageError::engine(e)),
            };

            let mut keys = Vec::new();
            for entry in t.iter().map_err(StorageError::engine)? {
                let (key, _) = entry.map_err(StorageError::engine)?;
                keys.push(key.value().to_string());
            }
            Ok(keys)
        })
    }

    fn get(&self, table: &str, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(StorageError::engine)?;
            let t = match txn.open_table(definition(table)) {
                Ok(t) => t,
                Err(TableError::TableDoesNotExist(_)) => return Ok(None),
                Err(e) => return Err(StorageError::engine(e)),
            };
            let value = t.get(key).map_err(StorageError::engine)?;
            Ok(value.map(|v| v.value().to_vec()))
        })
    }

    fn set(&self, table: &str, key: &str, value: &[u8]) -> StorageResult<()> {
        self.with_db(|db| {
            let txn = db.begin_write().map_err(StorageError::engine)?;
            {
                let mut t = txn
                    .open_table(definition(table))
                    .map_err(StorageError::engine)?;
                t.insert(key, value).map_err(StorageError::engine)?;
            }
            txn.commit().map_err(StorageError::engine)
        })
    }

    fn unset(&self, table: &str, key: &str) -> StorageResult<()> {
        self.with_db(|db| {
            let txn = db.begin_write().map_err(StorageError::engine)?;
            let exists = txn
                .list_tables()
                .map_err(StorageError::engine)?
                .any(|handle| handle.name() == table);
            if !exists {
                return txn.abort().map_err(StorageError::engine);
            }
            {
                let mut t = txn
                    .open_table(definition(table))
                    .map_err(StorageError::engine)?;
                t.remove(key).map_err(StorageError::engine)?;
            }
            txn.commit().map_err(StorageError::engine)
        })
    }

    fn unset_many(&self, table: &str, keys: &[String]) -> StorageResult<usize> {
        self.with_db(|db| {
            let txn = db.begin_write().map_err(StorageError::engine)?;
            let exists = txn
                .list_tables()
                .map_err(StorageError::engine)?
                .any(|handle| handle.name() == table);
            if !exists || keys.is_empty() {
                txn.abort().map_err(StorageError::engine)?;
                return Ok(0);
            }

            let mut removed = 0;
            {
                let mut t = txn
                    .open_table(definition(table))
                    .map_err(StorageError::engine)?;
                for key in keys {
                    if t.remove(key.as_str()).map_err(StorageError::engine)?.is_some() {
                        removed += 1;
                    }
                }
            }
            txn.commit().map_err(StorageError::engine)?;
            debug!(table, removed, "removed keys");
            Ok(removed)
        })
    }

    fn drop_table(&self, table: &str) -> StorageResult<()> {
        self.with_db(|db| {
            let txn = db.begin_write().map_err(StorageError::engine)?;
            let doomed: Vec<_> = txn
                .list_tables()
                .map_err(StorageError::engine)?
                .filter(|handle| in_subtree(handle.name(), table))
                .collect();
            if doomed.is_empty() {
                return txn.abort().map_err(StorageError::engine);
            }

            let count = doomed.len();
            for handle in doomed {
                txn.delete_table(handle).map_err(StorageError::engine)?;
            }
            txn.commit().map_err(StorageError::engine)?;
            debug!(table, count, "dropped tables");
            Ok(())
        })
    }

    fn close(&self) -> StorageResult<()> {
        if self.db.write().take().is_some() {
            debug!(path = %self.path.display(), "closed redb backend");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}
