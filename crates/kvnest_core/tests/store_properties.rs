//! Store behaviour that must hold on every backend.

use kvnest_core::{CoreError, Store, Table, SEPARATOR};
use std::thread;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
    tags: Vec<String>,
}

fn profile() -> Profile {
    Profile {
        name: "Alice".into(),
        age: 30,
        tags: vec!["admin".into(), "ops".into()],
    }
}

/// One in-memory store and one on disk. The temp dir must outlive the store.
fn stores() -> Vec<(Store, Option<TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let persistent = Store::open(dir.path().join("props.kv"), b"padlock").unwrap();
    vec![(Store::memory(), None), (persistent, Some(dir))]
}

#[test]
fn set_then_get_roundtrips() {
    for (store, _dir) in stores() {
        store.set("people", "alice", &profile()).unwrap();
        store.crypt_set("people", "alice-secret", &profile()).unwrap();

        assert_eq!(store.get::<Profile>("people", "alice").unwrap(), Some(profile()));
        assert_eq!(store.get::<Profile>("people", "alice-secret").unwrap(), Some(profile()));
        assert_eq!(store.get::<Profile>("people", "bob").unwrap(), None);
        assert!(store.exists("people", "alice").unwrap());
        assert!(!store.exists("people", "bob").unwrap());
        store.close().unwrap();
    }
}

#[test]
fn set_overwrites_and_switches_encryption() {
    for (store, _dir) in stores() {
        store.crypt_set("t", "k", &1u32).unwrap();
        store.set("t", "k", &2u32).unwrap();

        assert_eq!(store.get::<u32>("t", "k").unwrap(), Some(2));
        assert_eq!(store.raw_get("t", "k").unwrap().unwrap()[0], 0);
        assert_eq!(store.count_keys("t").unwrap(), 1);
        store.close().unwrap();
    }
}

#[test]
fn sub_store_writes_are_invisible_at_root() {
    for (store, _dir) in stores() {
        let app = store.sub("app").unwrap();
        app.set("users", "bob", "hi").unwrap();

        assert!(store.tables().unwrap().is_empty());
        assert_eq!(store.get::<String>("users", "bob").unwrap(), None);
        assert_eq!(app.tables().unwrap(), vec!["users"]);
        assert_eq!(store.namespaces(true).unwrap(), vec!["app"]);

        // Same name at root is a different table
        store.set("users", "carol", "root").unwrap();
        assert_eq!(app.keys("users").unwrap(), vec!["bob"]);
        assert_eq!(store.keys("users").unwrap(), vec!["carol"]);
        store.close().unwrap();
    }
}

#[test]
fn drop_cascades_to_namespace_subtree() {
    for (store, _dir) in stores() {
        store.set("a", "k", &1u8).unwrap();
        store.sub("a").unwrap().set("x", "k", &1u8).unwrap();
        store.sub("a").unwrap().set("y", "k", &1u8).unwrap();
        store.set("ab", "k", &1u8).unwrap();

        store.drop("a").unwrap();

        assert_eq!(store.tables().unwrap(), vec!["ab"]);
        assert!(store.namespaces(false).unwrap().is_empty());
        assert_eq!(store.count_keys("a").unwrap(), 0);
        assert_eq!(store.sub("a").unwrap().count_keys("x").unwrap(), 0);
        assert_eq!(store.get::<u8>("ab", "k").unwrap(), Some(1));
        store.close().unwrap();
    }
}

#[test]
fn drop_inside_sub_store_stays_inside() {
    for (store, _dir) in stores() {
        let a = store.sub("a").unwrap();
        a.set("t", "k", &1u8).unwrap();
        store.set("t", "k", &1u8).unwrap();

        a.drop("t").unwrap();
        a.drop("never-existed").unwrap();

        assert!(a.tables().unwrap().is_empty());
        assert_eq!(store.tables().unwrap(), vec!["t"]);
        store.close().unwrap();
    }
}

#[test]
fn records_carry_encryption_flag() {
    for (store, _dir) in stores() {
        store.set("t", "plain", "visible").unwrap();
        store.crypt_set("t", "secret", "hidden").unwrap();

        let plain = store.raw_get("t", "plain").unwrap().unwrap();
        let secret = store.raw_get("t", "secret").unwrap().unwrap();
        assert_eq!(plain[0], 0);
        assert_eq!(secret[0], 1);
        assert!(!secret.windows(6).any(|w| w == b"hidden"));

        assert_eq!(store.get::<String>("t", "plain").unwrap().as_deref(), Some("visible"));
        assert_eq!(store.get::<String>("t", "secret").unwrap().as_deref(), Some("hidden"));
        store.close().unwrap();
    }
}

#[test]
fn count_keys_matches_keys() {
    for (store, _dir) in stores() {
        assert_eq!(store.count_keys("unknown").unwrap(), 0);
        assert!(store.keys("unknown").unwrap().is_empty());

        for i in 0..25u32 {
            store.set("numbers", &format!("n{i:02}"), &i).unwrap();
        }
        store.unset("numbers", "n03").unwrap();
        store.unset("numbers", "absent").unwrap();
        store.unset("no-such-table", "absent").unwrap();

        let keys = store.keys("numbers").unwrap();
        assert_eq!(store.count_keys("numbers").unwrap(), keys.len());
        assert_eq!(keys.len(), 24);
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(!store.tables().unwrap().contains(&"no-such-table".to_string()));
        store.close().unwrap();
    }
}

#[test]
fn emptied_table_is_still_listed() {
    for (store, _dir) in stores() {
        store.set("t", "k", &1u8).unwrap();
        store.unset("t", "k").unwrap();

        assert_eq!(store.tables().unwrap(), vec!["t"]);
        assert_eq!(store.count_keys("t").unwrap(), 0);
        store.close().unwrap();
    }
}

#[test]
fn buckets_converge_from_any_namespace() {
    for (store, _dir) in stores() {
        let from_root = store.bucket("team").unwrap();
        let from_deep = store.sub("a").unwrap().sub("b").unwrap().bucket("team").unwrap();

        from_root.set("shared", "k", "written at root").unwrap();
        assert_eq!(
            from_deep.get::<String>("shared", "k").unwrap().as_deref(),
            Some("written at root")
        );
        assert_eq!(from_root.prefix(), from_deep.prefix());

        assert_eq!(store.namespaces(true).unwrap(), vec!["__shared__"]);
        assert_eq!(
            store.namespaces(false).unwrap(),
            vec![format!("__shared__{SEPARATOR}team{SEPARATOR}shared")]
        );
        store.close().unwrap();
    }
}

#[test]
fn namespaces_by_depth() {
    for (store, _dir) in stores() {
        let a = store.sub("a").unwrap();
        a.set("t1", "k", &1u8).unwrap();
        a.sub("b").unwrap().set("t2", "k", &1u8).unwrap();
        store.sub("c").unwrap().set("t3", "k", &1u8).unwrap();
        store.set("top", "k", &1u8).unwrap();

        assert_eq!(store.namespaces(true).unwrap(), vec!["a", "c"]);
        assert_eq!(a.namespaces(true).unwrap(), vec!["b"]);
        assert_eq!(
            a.namespaces(false).unwrap(),
            vec![format!("b{SEPARATOR}t2")]
        );
        assert_eq!(store.tables().unwrap(), vec!["top"]);
        store.close().unwrap();
    }
}

#[test]
fn separator_in_names_is_rejected() {
    for (store, _dir) in stores() {
        let bad = format!("a{SEPARATOR}b");
        assert!(matches!(
            store.set(&bad, "k", &1u8),
            Err(CoreError::InvalidName { .. })
        ));
        assert!(store.sub(&bad).is_err());
        assert!(store.bucket(&bad).is_err());
        assert!(store.tables().unwrap().is_empty());
        store.close().unwrap();
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn handles_cross_threads() {
    assert_send_sync::<Store>();
    assert_send_sync::<Table>();
}

#[test]
fn concurrent_sub_stores_stay_isolated() {
    for (store, _dir) in stores() {
        thread::scope(|scope| {
            for worker in 0..8 {
                let store = store.clone();
                scope.spawn(move || {
                    let ns = store.sub(&format!("worker{worker}")).unwrap();
                    for n in 0..50u32 {
                        let key = format!("k{n}");
                        ns.crypt_set("t", &key, &(worker * 1000 + n)).unwrap();
                        assert_eq!(ns.get::<u32>("t", &key).unwrap(), Some(worker * 1000 + n));
                    }
                });
            }
        });

        assert_eq!(store.namespaces(true).unwrap().len(), 8);
        for worker in 0..8 {
            let ns = store.sub(&format!("worker{worker}")).unwrap();
            assert_eq!(ns.count_keys("t").unwrap(), 50);
            assert_eq!(ns.get::<u32>("t", "k49").unwrap(), Some(worker * 1000 + 49));
        }
        store.close().unwrap();
    }
}
