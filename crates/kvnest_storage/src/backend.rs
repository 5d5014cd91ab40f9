//! Storage backend trait definition.

use crate::error::StorageResult;

/// A flat table store.
///
/// Backends hold a set of named tables, each mapping string keys to opaque
/// byte values. They do not interpret values, and they know nothing about
/// namespaces beyond the cascading rule of [`drop_table`](KvBackend::drop_table).
///
/// # Invariants
///
/// - A missing table or key is never an error: reads return `None`, `0`
///   or an empty list, `unset` is a no-op
/// - `set` creates the table on first write
/// - `tables` never lists [`SYSTEM_TABLE`](crate::SYSTEM_TABLE)
/// - After `close`, every operation except `close` returns
///   [`StorageError::Closed`](crate::StorageError::Closed)
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing and ephemeral stores
/// - [`super::RedbBackend`] - For persistent storage
pub trait KvBackend: Send + Sync {
    /// Lists every table currently holding data, system table excluded.
    ///
    /// Names are fully qualified and returned in sorted order.
    fn tables(&self) -> StorageResult<Vec<String>>;

    /// Returns the number of keys in `table`, or 0 if it does not exist.
    fn count_keys(&self, table: &str) -> StorageResult<usize>;

    /// Lists the keys of `table` in sorted order.
    fn keys(&self, table: &str) -> StorageResult<Vec<String>>;

    /// Reads the raw value stored at `key` in `table`.
    fn get(&self, table: &str, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Stores `value` at `key`, creating `table` if needed.
    fn set(&self, table: &str, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Removes `key` from `table`.
    fn unset(&self, table: &str, key: &str) -> StorageResult<()>;

    /// Removes every key in `keys` from `table` as one write.
    ///
    /// Absent keys are skipped. Returns how many keys were actually removed.
    fn unset_many(&self, table: &str, keys: &[String]) -> StorageResult<usize>;

    /// Removes `table` and every table nested beneath it.
    ///
    /// A table is nested beneath `table` when its name starts with `table`
    /// followed by [`SEPARATOR`](crate::SEPARATOR). An empty `table` matches
    /// nothing.
    fn drop_table(&self, table: &str) -> StorageResult<()>;

    /// Releases underlying resources.
    ///
    /// Calling `close` more than once is allowed.
    fn close(&self) -> StorageResult<()>;

    /// A short name for this backend, used in logging.
    fn name(&self) -> &'static str;
}
