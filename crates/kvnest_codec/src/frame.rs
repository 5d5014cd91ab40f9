//! Record framing.
//!
//! Every stored value carries a one-byte flag in front of its payload:
//!
//! ```text
//! ┌──────┬─────────────────────────────┐
//! │ flag │ payload                     │
//! │ 0x00 │ CBOR bytes                  │
//! │ 0x01 │ encrypted CBOR bytes        │
//! └──────┴─────────────────────────────┘
//! ```
//!
//! The flag belongs to the record, not the table, so plaintext and
//! encrypted records can sit side by side.

use crate::error::{CodecError, CodecResult};

/// Leading flag of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    /// Payload is plain CBOR.
    Plain = 0,
    /// Payload must be decrypted before decoding.
    Encrypted = 1,
}

impl Flag {
    /// Returns the on-disk byte for this flag.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parses a flag byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownFlag`] for anything but `0` and `1`.
    pub fn from_byte(byte: u8) -> CodecResult<Self> {
        match byte {
            0 => Ok(Self::Plain),
            1 => Ok(Self::Encrypted),
            flag => Err(CodecError::UnknownFlag { flag }),
        }
    }
}

/// Prepends `flag` to `payload`.
#[must_use]
pub fn frame(flag: Flag, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(flag.as_byte());
    out.extend_from_slice(payload);
    out
}

/// Splits a stored record into its flag and payload.
///
/// Empty input yields `Ok(None)`: an absent record is not an error.
pub fn split(record: &[u8]) -> CodecResult<Option<(Flag, &[u8])>> {
    match record.split_first() {
        None => Ok(None),
        Some((&flag, payload)) => Ok(Some((Flag::from_byte(flag)?, payload))),
    }
}

/// Returns true if `record` is flagged as encrypted.
///
/// Used by maintenance passes that look at raw records without decoding.
#[must_use]
pub fn is_encrypted(record: &[u8]) -> bool {
    record.first() == Some(&Flag::Encrypted.as_byte())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_prefixes_flag() {
        assert_eq!(frame(Flag::Plain, b"abc"), b"\x00abc");
        assert_eq!(frame(Flag::Encrypted, b"abc"), b"\x01abc");
    }

    #[test]
    fn split_recovers_parts() {
        let record = frame(Flag::Encrypted, b"xyz");
        let (flag, payload) = split(&record).unwrap().unwrap();
        assert_eq!(flag, Flag::Encrypted);
        assert_eq!(payload, b"xyz");
    }

    #[test]
    fn split_empty_is_absent() {
        assert_eq!(split(&[]).unwrap(), None);
    }

    #[test]
    fn split_unknown_flag_fails() {
        assert_eq!(split(&[7, 1, 2]), Err(CodecError::UnknownFlag { flag: 7 }));
    }

    #[test]
    fn flag_only_record_has_empty_payload() {
        let (flag, payload) = split(&[0]).unwrap().unwrap();
        assert_eq!(flag, Flag::Plain);
        assert!(payload.is_empty());
    }

    #[test]
    fn is_encrypted_checks_first_byte() {
        assert!(is_encrypted(b"\x01"));
        assert!(!is_encrypted(b"\x00\x01"));
        assert!(!is_encrypted(b""));
    }
}
