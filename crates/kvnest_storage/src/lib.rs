//! # kvnest Storage
//!
//! Flat table backends for kvnest.
//!
//! This crate provides the lowest-level storage abstraction for kvnest.
//! A backend is a set of named tables mapping string keys to **opaque
//! bytes** - it does not interpret the values it stores.
//!
//! ## Design Principles
//!
//! - Backends are simple table stores (get, set, unset, drop, enumerate)
//! - Absence is never an error
//! - Namespaces exist only as a naming convention (see [`names`])
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`RedbBackend`] - For persistent, transactional storage on redb
//!
//! ## Example
//!
//! ```rust
//! use kvnest_storage::{InMemoryBackend, KvBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.set("config", "theme", b"\x00dark").unwrap();
//! let value = backend.get("config", "theme").unwrap();
//! assert_eq!(value.as_deref(), Some(&b"\x00dark"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;
pub mod names;
mod redb_backend;

pub use backend::KvBackend;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryBackend;
pub use names::{SEPARATOR, SYSTEM_TABLE};
pub use redb_backend::{RedbBackend, RedbOptions};
