//! # kvnest Core
//!
//! A namespaced, optionally encrypted table store.
//!
//! Values are serialized with serde and kept in named tables of string
//! keys. Tables live in nested namespaces ("sub-stores") or in shared
//! buckets, all mapped onto the flat table space of a
//! [`kvnest_storage`] backend. Any single value can be stored encrypted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kvnest_core::Store;
//!
//! let store = Store::open("app.kv", b"padlock")?;
//!
//! let settings = store.sub("settings")?;
//! settings.set("ui", "theme", "dark")?;
//! settings.crypt_set("auth", "token", "s3cr3t")?;
//!
//! let theme: Option<String> = settings.get("ui", "theme")?;
//! assert_eq!(theme.as_deref(), Some("dark"));
//!
//! store.close()?;
//! # Ok::<(), kvnest_core::CoreError>(())
//! ```
//!
//! ## Padlock
//!
//! A database is bound to the padlock it is first opened with. Opening it
//! with anything else fails with [`CoreError::BadPadlock`]. A lost padlock
//! is recovered with [`crypt_reset`], which deletes every encrypted value
//! and keeps the plain ones.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod crypto;
mod encoder;
mod error;
mod keys;
pub mod namespace;
mod store;
mod table;

pub use config::Config;
pub use encoder::Encoder;
pub use error::{CoreError, CoreResult};
pub use keys::{crypt_reset, crypt_reset_with_config};
pub use namespace::{Namespace, SHARED_ROOT};
pub use store::Store;
pub use table::Table;

pub use kvnest_storage::{StorageError, SEPARATOR};
