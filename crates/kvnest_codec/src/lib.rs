//! # kvnest Codec
//!
//! Value serialization and record framing for kvnest.
//!
//! Values are marshalled with serde into CBOR and stored behind a one-byte
//! [`Flag`] that says whether the payload is encrypted. Encryption itself
//! lives in `kvnest_core`; this crate only knows the byte layout.
//!
//! ## Usage
//!
//! ```
//! use kvnest_codec::{frame, from_cbor, split, to_cbor, Flag};
//!
//! let payload = to_cbor(&vec![1u32, 2, 3]).unwrap();
//! let record = frame(Flag::Plain, &payload);
//!
//! let (flag, body) = split(&record).unwrap().unwrap();
//! assert_eq!(flag, Flag::Plain);
//! let decoded: Vec<u32> = from_cbor(body).unwrap();
//! assert_eq!(decoded, vec![1, 2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod frame;

pub use cbor::{from_cbor, to_cbor};
pub use error::{CodecError, CodecResult};
pub use frame::{frame, is_encrypted, split, Flag};
