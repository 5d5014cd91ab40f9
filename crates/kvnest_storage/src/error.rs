//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Absence of a table or key is never an error; backends report it through
/// `Option`/empty results instead.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Another instance holds the exclusive lock on the database file.
    #[error("database is currently in use by an existing instance: {path}")]
    Locked {
        /// The database file that could not be locked.
        path: String,
    },

    /// The embedded engine reported a failure.
    #[error("engine error: {0}")]
    Engine(String),

    /// The storage file is corrupted.
    #[error("storage corrupted: {0}")]
    Corrupted(String),

    /// The storage is closed.
    #[error("storage is closed")]
    Closed,
}

impl StorageError {
    /// Wraps any redb error into [`StorageError::Engine`].
    ///
    /// Corruption reported by the engine is surfaced as
    /// [`StorageError::Corrupted`] so callers can tell it apart.
    pub fn engine(err: impl Into<redb::Error>) -> Self {
        match err.into() {
            redb::Error::Corrupted(msg) => Self::Corrupted(msg),
            redb::Error::Io(e) => Self::Io(e),
            other => Self::Engine(other.to_string()),
        }
    }

    /// Returns true if this error is the distinguished lock contention error.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}
