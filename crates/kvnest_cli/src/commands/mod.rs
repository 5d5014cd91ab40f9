//! CLI command implementations.

pub mod crypt_reset;
pub mod keys;
pub mod namespaces;
pub mod tables;

use kvnest_core::{Config, CoreResult, Store};
use std::path::Path;

/// Opens an existing database for inspection.
pub fn open(path: &Path, padlock: &[u8]) -> CoreResult<Store> {
    Store::open_with_config(path, padlock, &Config::new().create_if_missing(false))
}

/// Walks from `store` down a '/'-separated namespace path.
///
/// Empty segments are skipped, so `"a//b/"` is the same as `"a/b"`.
pub fn descend(store: &Store, namespace: Option<&str>) -> CoreResult<Store> {
    let mut current = store.clone();
    for segment in namespace.unwrap_or_default().split('/') {
        if !segment.is_empty() {
            current = current.sub(segment)?;
        }
    }
    Ok(current)
}

/// Display form of a namespace path.
pub fn display_namespace(namespace: Option<&str>) -> String {
    match namespace.map(|ns| ns.trim_matches('/')) {
        None | Some("") => "/".to_string(),
        Some(ns) => format!("/{ns}"),
    }
}
