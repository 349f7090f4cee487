//! Wire serialization.
//!
//! The engine's encode/decode policy (record size bounds, snapshot
//! semantics) lives here; predicate and storage logic never touch raw
//! bytes directly.

mod cbor;
mod snapshot;

pub use snapshot::{InstanceSnapshot, revive, snapshot};

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error as ThisError;

/// Max serialized bytes for a single record, to keep decodes bounded.
pub const MAX_RECORD_BYTES: u32 = 1024 * 1024;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}

///
/// SerializeErrorKind
///
/// Stable error-kind taxonomy for serializer failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Serialize,
    Deserialize,
    DeserializeSizeLimitExceeded,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
            Self::DeserializeSizeLimitExceeded => "deserialize_size_limit_exceeded",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SerializeError {
    /// Return a stable error kind independent of backend error-message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Serialize(_) => SerializeErrorKind::Serialize,
            Self::Deserialize(_) => SerializeErrorKind::Deserialize,
            Self::DeserializeSizeLimitExceeded { .. } => {
                SerializeErrorKind::DeserializeSizeLimitExceeded
            }
        }
    }
}

/// Serialize a value into the engine's wire encoding.
pub fn serialize<T>(ty: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::serialize(ty)
}

/// Deserialize a value produced by [`serialize`], bounded by
/// [`MAX_RECORD_BYTES`].
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize(bytes, MAX_RECORD_BYTES as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldMap, Value};

    #[test]
    fn field_map_round_trips_through_wire_encoding() {
        let map: FieldMap = [
            ("name".to_string(), Value::Text("erz12".to_string())),
            ("strike".to_string(), Value::Int(100)),
        ]
        .into_iter()
        .collect();

        let bytes = serialize(&map).expect("serialize");
        let decoded: FieldMap = deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, map);
    }

    #[test]
    fn oversized_payload_is_rejected_before_decode() {
        let bytes = vec![0u8; MAX_RECORD_BYTES as usize + 1];
        let err = deserialize::<FieldMap>(&bytes).expect_err("oversize must fail");
        assert_eq!(
            err.kind(),
            SerializeErrorKind::DeserializeSizeLimitExceeded
        );
    }

    #[test]
    fn garbage_bytes_fail_cleanly() {
        let err = deserialize::<FieldMap>(&[0xff, 0x00, 0x13]).expect_err("garbage must fail");
        assert_eq!(err.kind(), SerializeErrorKind::Deserialize);
    }
}
