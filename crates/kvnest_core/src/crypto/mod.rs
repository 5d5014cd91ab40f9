//! Cryptographic operations for kvnest.
//!
//! ## Security Model
//!
//! - Each store owns one random 256-bit [`MasterKey`]
//! - Values written with `crypt_set` go through [`ValueCipher`]: AES-256 in
//!   CFB mode, keyed by SHA-256 of the master key
//! - The master key is persisted only in sealed form: [`PadlockSealer`]
//!   wraps it with AES-256-GCM under a key derived from the caller's
//!   padlock with HKDF-SHA256
//! - Keys are zeroized on drop
//!
//! ## Usage
//!
//! ```
//! use kvnest_core::crypto::{MasterKey, PadlockSealer, ValueCipher};
//!
//! let key = MasterKey::generate();
//! let cipher = ValueCipher::new(&key);
//! let ciphertext = cipher.encrypt(b"secret").unwrap();
//! assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"secret");
//!
//! let sealer = PadlockSealer::derive(b"hunter2", b"per-database-salt").unwrap();
//! let sealed = sealer.seal(&key).unwrap();
//! assert_eq!(sealer.unseal(&sealed).unwrap().as_bytes(), key.as_bytes());
//! ```

mod cipher;
mod key;
mod seal;

pub use cipher::{ValueCipher, IV_SIZE};
pub use key::{MasterKey, KEY_SIZE};
pub use seal::{PadlockSealer, NONCE_SIZE, TAG_SIZE};
