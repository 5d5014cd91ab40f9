//! Store configuration.

use kvnest_storage::RedbOptions;
use std::time::Duration;

/// Configuration for opening a persistent store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,

    /// How long `open` waits for another instance to release the file.
    pub lock_timeout: Duration,

    /// Pause between two attempts to take the file lock.
    pub lock_retry_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            lock_timeout: Duration::from_secs(1),
            lock_retry_interval: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets how long to wait for the file lock.
    #[must_use]
    pub const fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the pause between lock attempts.
    #[must_use]
    pub const fn lock_retry_interval(mut self, interval: Duration) -> Self {
        self.lock_retry_interval = interval;
        self
    }

    pub(crate) fn redb_options(&self) -> RedbOptions {
        RedbOptions {
            lock_timeout: self.lock_timeout,
            retry_interval: self.lock_retry_interval,
            create_if_missing: self.create_if_missing,
        }
    }
}
