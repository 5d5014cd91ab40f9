//! Keys command implementation.

use super::{descend, open};
use kvnest_codec::is_encrypted;
use kvnest_core::{CoreResult, Store};
use serde::Serialize;
use std::path::Path;

/// One key of a table.
#[derive(Debug, Serialize)]
pub struct KeyInfo {
    /// The key.
    pub key: String,
    /// Whether the stored record is encrypted.
    pub encrypted: bool,
    /// Stored record size in bytes, flag included.
    pub size: usize,
}

/// Runs the keys command.
pub fn run(
    path: &Path,
    padlock: &[u8],
    namespace: Option<&str>,
    table: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open(path, padlock)?;
    let result = collect(&store, namespace, table);
    store.close()?;
    let keys = result?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&keys)?),
        _ => {
            println!("{} keys in {table}", keys.len());
            for info in &keys {
                let marker = if info.encrypted { "[enc]" } else { "     " };
                println!("  {marker} {:<32} {} bytes", info.key, info.size);
            }
        }
    }
    Ok(())
}

/// Lists the keys of `table` without decoding values.
pub fn collect(store: &Store, namespace: Option<&str>, table: &str) -> CoreResult<Vec<KeyInfo>> {
    let ns = descend(store, namespace)?;
    let mut out = Vec::new();
    for key in ns.keys(table)? {
        // A key can vanish between listing and reading
        let Some(record) = ns.raw_get(table, &key)? else {
            continue;
        };
        out.push(KeyInfo {
            encrypted: is_encrypted(&record),
            size: record.len(),
            key,
        });
    }
    Ok(out)
}
