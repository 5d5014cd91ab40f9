//! Focused table view.

use crate::error::CoreResult;
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A [`Store`] with the table name fixed.
///
/// Obtained from [`Store::table`]. Every method forwards to the store
/// method of the same name.
#[derive(Debug, Clone)]
pub struct Table {
    store: Store,
    name: String,
}

impl Table {
    pub(crate) fn new(store: Store, name: &str) -> Self {
        Self {
            store,
            name: name.to_string(),
        }
    }

    /// Returns the table name, relative to the store's namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the store this view belongs to.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Reads and decodes the value at `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        self.store.get(&self.name, key)
    }

    /// Stores `value` in plain form.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CoreResult<()> {
        self.store.set(&self.name, key, value)
    }

    /// Stores `value` encrypted.
    pub fn crypt_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CoreResult<()> {
        self.store.crypt_set(&self.name, key, value)
    }

    /// Lists keys in sorted order.
    pub fn keys(&self) -> CoreResult<Vec<String>> {
        self.store.keys(&self.name)
    }

    /// Counts keys.
    pub fn count_keys(&self) -> CoreResult<usize> {
        self.store.count_keys(&self.name)
    }

    /// Removes `key`.
    pub fn unset(&self, key: &str) -> CoreResult<()> {
        self.store.unset(&self.name, key)
    }

    /// Drops the table and any namespace of the same name.
    pub fn drop(&self) -> CoreResult<()> {
        self.store.drop(&self.name)
    }

    /// Returns true if `key` is present.
    pub fn exists(&self, key: &str) -> CoreResult<bool> {
        self.store.exists(&self.name, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_to_store() {
        let store = Store::memory();
        let users = store.table("users").unwrap();
        assert_eq!(users.name(), "users");

        users.set("alice", &30u32).unwrap();
        users.crypt_set("bob", &31u32).unwrap();

        assert_eq!(users.get::<u32>("alice").unwrap(), Some(30));
        assert_eq!(users.get::<u32>("bob").unwrap(), Some(31));
        assert_eq!(users.keys().unwrap(), vec!["alice", "bob"]);
        assert_eq!(users.count_keys().unwrap(), 2);
        assert_eq!(store.keys("users").unwrap(), users.keys().unwrap());

        users.unset("alice").unwrap();
        assert!(!users.exists("alice").unwrap());
        assert!(users.exists("bob").unwrap());
    }

    #[test]
    fn drop_clears_table() {
        let store = Store::memory();
        let t = store.table("t").unwrap();
        t.set("k", "v").unwrap();
        t.drop().unwrap();

        assert_eq!(t.count_keys().unwrap(), 0);
        assert!(store.tables().unwrap().is_empty());
    }

    #[test]
    fn view_in_sub_store_stays_in_namespace() {
        let store = Store::memory();
        let t = store.sub("ns").unwrap().table("t").unwrap();
        t.set("k", &1u8).unwrap();

        assert!(store.tables().unwrap().is_empty());
        assert_eq!(t.store().tables().unwrap(), vec!["t"]);
    }
}
