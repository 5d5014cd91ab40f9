//! Error types for kvnest core.

use kvnest_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in kvnest core operations.
///
/// A missing table or key is never reported here; lookups return `None`
/// or empty results instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// CBOR codec or record framing error.
    #[error("codec error: {0}")]
    Codec(#[from] kvnest_codec::CodecError),

    /// Another instance holds the database file.
    #[error("database locked: {path} is in use by an existing instance, close it and try again")]
    Locked {
        /// The database file.
        path: String,
    },

    /// The supplied padlock does not open this database.
    #[error("bad padlock: the supplied secret does not unlock this database")]
    BadPadlock,

    /// A table or namespace name was rejected.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The persisted lock state could not be understood.
    #[error("invalid lock state: {message}")]
    InvalidLockState {
        /// Description of the problem.
        message: String,
    },

    /// Encryption failed.
    #[error("encryption failed: {message}")]
    EncryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Decryption failed.
    #[error("decryption failed: {message}")]
    DecryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Invalid key size.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// Key derivation failed.
    #[error("key derivation failed: {message}")]
    KeyDerivationFailed {
        /// Description of the failure.
        message: String,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Locked { path } => Self::Locked { path },
            other => Self::Storage(other),
        }
    }
}

impl CoreError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Creates an invalid lock state error.
    pub fn invalid_lock_state(message: impl Into<String>) -> Self {
        Self::InvalidLockState {
            message: message.into(),
        }
    }

    /// Creates an encryption failed error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            message: message.into(),
        }
    }

    /// Creates a decryption failed error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }

    /// Creates a key derivation failed error.
    pub fn key_derivation_failed(message: impl Into<String>) -> Self {
        Self::KeyDerivationFailed {
            message: message.into(),
        }
    }

    /// Returns true for the lock contention error.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }

    /// Returns true for the wrong-secret error.
    #[must_use]
    pub fn is_bad_padlock(&self) -> bool {
        matches!(self, Self::BadPadlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_locked_becomes_core_locked() {
        let err: CoreError = StorageError::Locked {
            path: "db.kv".into(),
        }
        .into();
        assert!(err.is_locked());
        assert!(err.to_string().contains("db.kv"));
    }

    #[test]
    fn other_storage_errors_are_wrapped() {
        let err: CoreError = StorageError::Closed.into();
        assert!(matches!(err, CoreError::Storage(StorageError::Closed)));
    }

    #[test]
    fn invalid_name_display() {
        let err = CoreError::invalid_name("a\u{1f}b", "contains the namespace separator");
        assert!(err.to_string().contains("separator"));
    }
}
