//! Namespaces command implementation.

use super::{descend, display_namespace, open};
use kvnest_core::{CoreResult, Store, SEPARATOR};
use serde::Serialize;
use std::path::Path;

/// Namespaces listing result.
#[derive(Debug, Serialize)]
pub struct NamespacesResult {
    /// Namespace the listing starts from.
    pub namespace: String,
    /// Nested names, '/'-separated.
    pub namespaces: Vec<String>,
}

/// Runs the namespaces command.
pub fn run(
    path: &Path,
    padlock: &[u8],
    namespace: Option<&str>,
    all: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open(path, padlock)?;
    let result = collect(&store, namespace, all);
    store.close()?;
    let result = result?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            println!("Namespaces under {}", result.namespace);
            for name in &result.namespaces {
                println!("  {name}");
            }
        }
    }
    Ok(())
}

/// Gathers the namespaces nested below `namespace`.
///
/// With `all`, every nested table is listed by its full relative path.
pub fn collect(store: &Store, namespace: Option<&str>, all: bool) -> CoreResult<NamespacesResult> {
    let ns = descend(store, namespace)?;
    let namespaces = ns
        .namespaces(!all)?
        .into_iter()
        .map(|name| name.replace(SEPARATOR, "/"))
        .collect();

    Ok(NamespacesResult {
        namespace: display_namespace(namespace),
        namespaces,
    })
}
