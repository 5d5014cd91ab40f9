//! The store handle.

use crate::config::Config;
use crate::crypto::MasterKey;
use crate::encoder::Encoder;
use crate::error::CoreResult;
use crate::keys;
use crate::namespace::Namespace;
use crate::table::Table;
use kvnest_storage::{InMemoryBackend, KvBackend, RedbBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct Shared {
    backend: Box<dyn KvBackend>,
    encoder: Encoder,
}

/// A handle to one database, positioned at a namespace.
///
/// Cloning is cheap: clones, sub-stores and buckets all share the same
/// backend and encoder. Closing any of them closes the database for all.
///
/// # Example
///
/// ```
/// use kvnest_core::Store;
///
/// let store = Store::memory();
/// store.set("users", "alice", &42u32).unwrap();
/// store.crypt_set("users", "token", "s3cr3t").unwrap();
///
/// assert_eq!(store.get::<u32>("users", "alice").unwrap(), Some(42));
/// assert_eq!(store.keys("users").unwrap(), vec!["alice", "token"]);
///
/// let app = store.sub("app").unwrap();
/// app.set("users", "bob", &1u32).unwrap();
/// assert_eq!(store.namespaces(true).unwrap(), vec!["app"]);
/// ```
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
    ns: Namespace,
}

impl Store {
    /// Opens or creates the database at `path`, unlocking it with `padlock`.
    ///
    /// A new database binds whatever padlock it is first opened with. An
    /// interrupted [`crypt_reset`](crate::crypt_reset) is finished before
    /// the padlock is checked.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Locked`](crate::CoreError::Locked) if another
    ///   instance holds the file
    /// - [`CoreError::BadPadlock`](crate::CoreError::BadPadlock) if
    ///   `padlock` is not the one the database was sealed with
    pub fn open(path: impl AsRef<Path>, padlock: &[u8]) -> CoreResult<Self> {
        Self::open_with_config(path, padlock, &Config::default())
    }

    /// Opens the database at `path` with explicit configuration.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        padlock: &[u8],
        config: &Config,
    ) -> CoreResult<Self> {
        let path = path.as_ref();
        let backend = RedbBackend::open_with_options(path, &config.redb_options())?;
        info!(path = %path.display(), "opened store");
        Self::with_backend(backend, padlock)
    }

    /// Creates an ephemeral in-memory store with a random master key.
    #[must_use]
    pub fn memory() -> Self {
        Self::from_parts(Box::new(InMemoryBackend::new()), &MasterKey::generate())
    }

    /// Wraps an already opened backend, unlocking it with `padlock`.
    ///
    /// On failure the backend is closed before the error is returned.
    pub fn with_backend(backend: impl KvBackend + 'static, padlock: &[u8]) -> CoreResult<Self> {
        match keys::unlock(&backend, padlock) {
            Ok(key) => Ok(Self::from_parts(Box::new(backend), &key)),
            Err(err) => {
                if let Err(close_err) = backend.close() {
                    warn!(error = %close_err, "failed to close backend after unlock error");
                }
                Err(err)
            }
        }
    }

    fn from_parts(backend: Box<dyn KvBackend>, key: &MasterKey) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                encoder: Encoder::new(key),
            }),
            ns: Namespace::root(),
        }
    }

    fn backend(&self) -> &dyn KvBackend {
        self.shared.backend.as_ref()
    }

    /// Returns the raw namespace prefix of this handle.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.ns.prefix()
    }

    /// Returns the namespace this handle is positioned at.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// Returns a sub-store nested below this one.
    pub fn sub(&self, name: &str) -> CoreResult<Self> {
        Ok(Self {
            shared: Arc::clone(&self.shared),
            ns: self.ns.sub(name)?,
        })
    }

    /// Returns the shared namespace `name`.
    ///
    /// Every handle on the same database reaches the same bucket,
    /// whatever namespace it is positioned at.
    pub fn bucket(&self, name: &str) -> CoreResult<Self> {
        Ok(Self {
            shared: Arc::clone(&self.shared),
            ns: Namespace::shared(name)?,
        })
    }

    /// Returns a view bound to table `name`.
    pub fn table(&self, name: &str) -> CoreResult<Table> {
        self.ns.qualify(name)?;
        Ok(Table::new(self.clone(), name))
    }

    /// Lists the tables directly in this namespace.
    pub fn tables(&self) -> CoreResult<Vec<String>> {
        let all = self.backend().tables()?;
        Ok(self.ns.child_tables(all.iter().map(String::as_str)))
    }

    /// Lists namespaces nested below this one.
    ///
    /// With `limit_depth`, only the names of direct child namespaces are
    /// returned. Without it, every nested table is listed by its path
    /// relative to this namespace.
    pub fn namespaces(&self, limit_depth: bool) -> CoreResult<Vec<String>> {
        let all = self.backend().tables()?;
        Ok(self
            .ns
            .sub_namespaces(all.iter().map(String::as_str), limit_depth))
    }

    /// Drops `table` along with any namespace of the same name.
    pub fn drop(&self, table: &str) -> CoreResult<()> {
        let qualified = self.ns.qualify(table)?;
        self.backend().drop_table(&qualified)?;
        debug!(table = %qualified, "dropped table");
        Ok(())
    }

    /// Returns the number of keys in `table`.
    pub fn count_keys(&self, table: &str) -> CoreResult<usize> {
        let qualified = self.ns.qualify(table)?;
        Ok(self.backend().count_keys(&qualified)?)
    }

    /// Lists the keys of `table` in sorted order.
    pub fn keys(&self, table: &str) -> CoreResult<Vec<String>> {
        let qualified = self.ns.qualify(table)?;
        Ok(self.backend().keys(&qualified)?)
    }

    /// Stores `value` in plain form.
    pub fn set<T: Serialize + ?Sized>(&self, table: &str, key: &str, value: &T) -> CoreResult<()> {
        self.put(table, key, value, false)
    }

    /// Stores `value` encrypted with the store's master key.
    pub fn crypt_set<T: Serialize + ?Sized>(
        &self,
        table: &str,
        key: &str,
        value: &T,
    ) -> CoreResult<()> {
        self.put(table, key, value, true)
    }

    fn put<T: Serialize + ?Sized>(
        &self,
        table: &str,
        key: &str,
        value: &T,
        encrypt: bool,
    ) -> CoreResult<()> {
        let qualified = self.ns.qualify(table)?;
        let record = self.shared.encoder.encode(value, encrypt)?;
        self.backend().set(&qualified, key, &record)?;
        Ok(())
    }

    /// Removes `key` from `table`.
    pub fn unset(&self, table: &str, key: &str) -> CoreResult<()> {
        let qualified = self.ns.qualify(table)?;
        Ok(self.backend().unset(&qualified, key)?)
    }

    /// Reads and decodes the value at `key`, decrypting it if needed.
    ///
    /// # Errors
    ///
    /// Fails with a codec error if the stored record cannot be decoded as
    /// `T`. An absent key is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, table: &str, key: &str) -> CoreResult<Option<T>> {
        match self.raw_get(table, key)? {
            Some(record) => self.shared.encoder.decode(&record),
            None => Ok(None),
        }
    }

    /// Reads the stored record at `key` without decoding it.
    ///
    /// The first byte is the encryption flag.
    pub fn raw_get(&self, table: &str, key: &str) -> CoreResult<Option<Vec<u8>>> {
        let qualified = self.ns.qualify(table)?;
        Ok(self.backend().get(&qualified, key)?)
    }

    /// Returns true if `key` is present in `table`.
    pub fn exists(&self, table: &str, key: &str) -> CoreResult<bool> {
        Ok(self.raw_get(table, key)?.is_some())
    }

    /// Closes the database, releasing its file lock.
    ///
    /// Affects every handle sharing this database. Closing twice is a
    /// no-op; any other operation afterwards fails.
    pub fn close(&self) -> CoreResult<()> {
        self.backend().close()?;
        info!(backend = self.backend().name(), "closed store");
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend().name())
            .field("namespace", &self.ns.segments())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use kvnest_storage::StorageError;

    #[test]
    fn memory_store_roundtrip() {
        let store = Store::memory();
        store.set("t", "k", "v").unwrap();
        assert_eq!(store.get::<String>("t", "k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get::<String>("t", "missing").unwrap(), None);
        assert_eq!(store.get::<String>("nope", "k").unwrap(), None);
    }

    #[test]
    fn clones_share_the_backend() {
        let store = Store::memory();
        let other = store.clone();
        store.set("t", "k", &1u8).unwrap();
        assert!(other.exists("t", "k").unwrap());
    }

    #[test]
    fn prefix_tracks_position() {
        let store = Store::memory();
        assert_eq!(store.prefix(), "");
        assert_eq!(store.sub("a").unwrap().prefix(), "a\u{1f}");
        assert_eq!(
            store.sub("a").unwrap().bucket("b").unwrap().prefix(),
            "__shared__\u{1f}b\u{1f}"
        );
    }

    #[test]
    fn invalid_table_names_are_rejected() {
        let store = Store::memory();
        for name in ["", "a\u{1f}b"] {
            assert!(matches!(
                store.set(name, "k", &1u8),
                Err(CoreError::InvalidName { .. })
            ));
            assert!(store.table(name).is_err());
            assert!(store.sub(name).is_err());
        }
    }

    #[test]
    fn type_mismatch_is_codec_error() {
        let store = Store::memory();
        store.set("t", "k", "text").unwrap();
        assert!(matches!(store.get::<u64>("t", "k"), Err(CoreError::Codec(_))));
    }

    #[test]
    fn closed_store_rejects_operations() {
        let store = Store::memory();
        let sub = store.sub("a").unwrap();
        store.close().unwrap();
        store.close().unwrap();

        assert!(matches!(
            sub.keys("t"),
            Err(CoreError::Storage(StorageError::Closed))
        ));
    }

    #[test]
    fn debug_shows_namespace() {
        let store = Store::memory().sub("app").unwrap();
        let shown = format!("{store:?}");
        assert!(shown.contains("memory"));
        assert!(shown.contains("app"));
    }

    #[test]
    fn with_backend_checks_padlock() {
        let backend = InMemoryBackend::new();
        keys::unlock(&backend, b"pw").unwrap();

        let result = Store::with_backend(backend, b"wrong");
        assert!(result.unwrap_err().is_bad_padlock());
    }
}
