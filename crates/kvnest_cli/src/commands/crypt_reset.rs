//! Crypt reset command implementation.

use std::path::Path;
use tracing::info;

/// Runs the crypt-reset command.
pub fn run(path: &Path, confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("crypt-reset deletes every encrypted value; pass --yes to continue".into());
    }

    info!("Resetting padlock of {:?}", path);
    let removed = kvnest_core::crypt_reset(path)?;
    println!("Removed {removed} encrypted records");
    println!("The next open seals a new master key under the padlock it is given");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvnest_core::Store;

    #[test]
    fn refuses_without_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.kv");
        let store = Store::open(&path, b"pw").unwrap();
        store.crypt_set("t", "k", "v").unwrap();
        store.close().unwrap();

        assert!(run(&path, false).is_err());
        let store = Store::open(&path, b"pw").unwrap();
        assert!(store.exists("t", "k").unwrap());
        store.close().unwrap();

        run(&path, true).unwrap();
        let store = Store::open(&path, b"other").unwrap();
        assert!(!store.exists("t", "k").unwrap());
        store.close().unwrap();
    }
}
