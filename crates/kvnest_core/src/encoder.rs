//! Value encoding for a store.
//!
//! Write path: `[0] || cbor(v)` or `[1] || encrypt(cbor(v))`.
//! Read path: look at the flag, decrypt only if it is `1`, then decode.

use crate::crypto::{MasterKey, ValueCipher};
use crate::error::CoreResult;
use kvnest_codec::{frame, from_cbor, split, to_cbor, Flag};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Turns values into stored records and back.
///
/// Each store owns exactly one encoder, built from its master key at open
/// time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Encoder {
    cipher: ValueCipher,
}

impl Encoder {
    /// Creates the encoder for `master`.
    #[must_use]
    pub fn new(master: &MasterKey) -> Self {
        Self {
            cipher: ValueCipher::new(master),
        }
    }

    /// Serializes `value` into a framed record, encrypting it if asked to.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T, encrypt: bool) -> CoreResult<Vec<u8>> {
        let payload = to_cbor(value)?;
        if encrypt {
            let ciphertext = self.cipher.encrypt(&payload)?;
            Ok(frame(Flag::Encrypted, &ciphertext))
        } else {
            Ok(frame(Flag::Plain, &payload))
        }
    }

    /// Decodes a framed record.
    ///
    /// An empty record decodes to `None`; presence is the backend's call.
    pub fn decode<T: DeserializeOwned>(&self, record: &[u8]) -> CoreResult<Option<T>> {
        let Some((flag, payload)) = split(record)? else {
            return Ok(None);
        };

        let value = match flag {
            Flag::Plain => from_cbor(payload)?,
            Flag::Encrypted => from_cbor(&self.cipher.decrypt(payload)?)?,
        };
        Ok(Some(value))
    }
}
