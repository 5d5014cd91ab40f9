//! Tables command implementation.

use super::{descend, display_namespace, open};
use kvnest_core::{CoreResult, Store};
use serde::Serialize;
use std::path::Path;

/// Tables listing result.
#[derive(Debug, Serialize)]
pub struct TablesResult {
    /// Namespace that was listed.
    pub namespace: String,
    /// Tables directly in the namespace.
    pub tables: Vec<TableStats>,
}

/// Statistics for a single table.
#[derive(Debug, Serialize)]
pub struct TableStats {
    /// Table name.
    pub name: String,
    /// Number of keys.
    pub keys: usize,
}

/// Runs the tables command.
pub fn run(
    path: &Path,
    padlock: &[u8],
    namespace: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open(path, padlock)?;
    let result = collect(&store, namespace);
    store.close()?;
    let result = result?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

/// Gathers the tables of `namespace`.
pub fn collect(store: &Store, namespace: Option<&str>) -> CoreResult<TablesResult> {
    let ns = descend(store, namespace)?;
    let tables = ns
        .tables()?
        .into_iter()
        .map(|name| {
            let keys = ns.count_keys(&name)?;
            Ok(TableStats { name, keys })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(TablesResult {
        namespace: display_namespace(namespace),
        tables,
    })
}

fn print_text_output(result: &TablesResult) {
    println!("Tables in {}", result.namespace);
    if result.tables.is_empty() {
        println!("  (none)");
        return;
    }
    for table in &result.tables {
        println!("  {:<32} {} keys", table.name, table.keys);
    }
}
