//! CBOR marshalling via serde.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes any serde value to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if the value cannot be represented.
pub fn to_cbor<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buf)
}

/// Deserializes CBOR bytes into `T`.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] on malformed input or when the
/// bytes do not describe a `T`.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
        tags: Vec<String>,
    }

    #[test]
    fn struct_roundtrip() {
        let profile = Profile {
            name: "Alice".into(),
            age: 30,
            tags: vec!["admin".into()],
        };
        let bytes = to_cbor(&profile).unwrap();
        let decoded: Profile = from_cbor(&bytes).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn unsized_str_encodes() {
        let bytes = to_cbor("hello").unwrap();
        let decoded: String = from_cbor(&bytes).unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn map_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u64);
        map.insert("b".to_string(), 2u64);
        let decoded: BTreeMap<String, u64> = from_cbor(&to_cbor(&map).unwrap()).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn wrong_type_fails() {
        let bytes = to_cbor(&42u32).unwrap();
        let result: CodecResult<Profile> = from_cbor(&bytes);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn garbage_fails() {
        let result: CodecResult<String> = from_cbor(&[0xff, 0x00, 0x13]);
        assert!(result.is_err());
    }
}
