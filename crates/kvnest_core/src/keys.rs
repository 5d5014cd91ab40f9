//! Key management: the padlock protocol and crypt reset.
//!
//! The reserved [`SYSTEM_TABLE`] holds two plain records:
//!
//! - `lock`: a [`LockState`] with the master key sealed under the padlock
//! - `reset`: `true` while a crypt reset is in progress
//!
//! Both live in one table so that dropping it clears the marker and the
//! lock state in a single write.

use crate::config::Config;
use crate::crypto::{MasterKey, PadlockSealer};
use crate::error::{CoreError, CoreResult};
use kvnest_codec::{frame, from_cbor, is_encrypted, split, to_cbor, Flag};
use kvnest_storage::{KvBackend, RedbBackend, RedbOptions, SYSTEM_TABLE};
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

pub(crate) const RESET_KEY: &str = "reset";
pub(crate) const LOCK_KEY: &str = "lock";

const LOCK_VERSION: u32 = 1;
const SALT_SIZE: usize = 16;

/// Persisted lock state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LockState {
    pub(crate) version: u32,
    pub(crate) salt: Vec<u8>,
    pub(crate) sealed: Vec<u8>,
}

fn read_system<T: DeserializeOwned>(backend: &dyn KvBackend, key: &str) -> CoreResult<Option<T>> {
    let Some(record) = backend.get(SYSTEM_TABLE, key)? else {
        return Ok(None);
    };
    match split(&record)? {
        None => Ok(None),
        Some((Flag::Plain, payload)) => Ok(Some(from_cbor(payload)?)),
        Some((Flag::Encrypted, _)) => Err(CoreError::invalid_lock_state(format!(
            "system record {key:?} is flagged as encrypted"
        ))),
    }
}

fn write_system<T: Serialize>(backend: &dyn KvBackend, key: &str, value: &T) -> CoreResult<()> {
    let record = frame(Flag::Plain, &to_cbor(value)?);
    backend.set(SYSTEM_TABLE, key, &record)?;
    Ok(())
}

/// Returns true if a crypt reset was started and never finished.
pub(crate) fn reset_pending(backend: &dyn KvBackend) -> CoreResult<bool> {
    Ok(read_system::<bool>(backend, RESET_KEY)?.unwrap_or(false))
}

/// Records that a crypt reset has started.
pub(crate) fn mark_reset(backend: &dyn KvBackend) -> CoreResult<()> {
    write_system(backend, RESET_KEY, &true)
}

/// Recovers the master key for an opened backend.
///
/// Finishes any interrupted reset first. A backend without lock state gets
/// a fresh master key sealed under `padlock`; otherwise the stored key is
/// unsealed with it.
///
/// # Errors
///
/// Returns [`CoreError::BadPadlock`] if `padlock` does not open the stored
/// lock state.
pub(crate) fn unlock(backend: &dyn KvBackend, padlock: &[u8]) -> CoreResult<MasterKey> {
    if reset_pending(backend)? {
        warn!(backend = backend.name(), "resuming interrupted crypt reset");
        purge(backend)?;
    }

    match read_system::<LockState>(backend, LOCK_KEY)? {
        Some(state) => open_lock(&state, padlock),
        None => establish(backend, padlock),
    }
}

fn establish(backend: &dyn KvBackend, padlock: &[u8]) -> CoreResult<MasterKey> {
    let key = MasterKey::generate();
    let mut salt = vec![0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let sealed = PadlockSealer::derive(padlock, &salt)?.seal(&key)?;
    write_system(
        backend,
        LOCK_KEY,
        &LockState {
            version: LOCK_VERSION,
            salt,
            sealed,
        },
    )?;

    info!(backend = backend.name(), "new master key sealed");
    Ok(key)
}

fn open_lock(state: &LockState, padlock: &[u8]) -> CoreResult<MasterKey> {
    if state.version != LOCK_VERSION {
        return Err(CoreError::invalid_lock_state(format!(
            "unsupported lock state version {}",
            state.version
        )));
    }
    if state.salt.len() != SALT_SIZE {
        return Err(CoreError::invalid_lock_state("salt has the wrong length"));
    }

    let key = PadlockSealer::derive(padlock, &state.salt)?.unseal(&state.sealed)?;
    debug!("master key unsealed");
    Ok(key)
}

/// Deletes every encrypted record, then drops the system table.
///
/// Plain records are left alone. Each table is purged in one write, and
/// the system table goes last so a crash leaves the reset marker behind.
/// Returns the number of records removed.
pub(crate) fn purge(backend: &dyn KvBackend) -> CoreResult<usize> {
    let mut removed = 0;
    for table in backend.tables()? {
        let mut doomed = Vec::new();
        for key in backend.keys(&table)? {
            let encrypted = backend
                .get(&table, &key)?
                .is_some_and(|record| is_encrypted(&record));
            if encrypted {
                doomed.push(key);
            }
        }
        if !doomed.is_empty() {
            removed += backend.unset_many(&table, &doomed)?;
        }
    }

    backend.drop_table(SYSTEM_TABLE)?;
    info!(backend = backend.name(), removed, "crypt reset purge finished");
    Ok(removed)
}

/// Runs a full crypt reset on an opened backend.
pub(crate) fn reset(backend: &dyn KvBackend) -> CoreResult<usize> {
    mark_reset(backend)?;
    purge(backend)
}

/// Abandons the padlock of the database at `path`.
///
/// Every encrypted record is deleted and the lock state is cleared, so the
/// next open seals a new master key under whatever padlock it is given.
/// Plain records survive. Returns the number of records removed.
///
/// The file must already exist.
///
/// # Errors
///
/// Returns [`CoreError::Locked`] if another instance holds the file.
pub fn crypt_reset(path: impl AsRef<Path>) -> CoreResult<usize> {
    crypt_reset_with_config(path, &Config::default())
}

/// Like [`crypt_reset`], with explicit lock timing.
///
/// `config.create_if_missing` is ignored: resetting a database that does
/// not exist is an error.
pub fn crypt_reset_with_config(path: impl AsRef<Path>, config: &Config) -> CoreResult<usize> {
    let path = path.as_ref();
    let options = RedbOptions {
        create_if_missing: false,
        ..config.redb_options()
    };
    let backend = RedbBackend::open_with_options(path, &options)?;
    info!(path = %path.display(), "crypt reset started");

    let result = reset(&backend);
    let closed = backend.close();
    let removed = result?;
    closed?;
    Ok(removed)
}
