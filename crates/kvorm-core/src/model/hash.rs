//! Structural model identity.
//!
//! A model's hash is derived once, at finalize time, from its name and
//! ordered field signature. It is the permanent identity token for the
//! model: previously persisted data stays addressable across process
//! restarts as long as the declaration is unchanged.

use crate::model::field::FieldModel;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// Width of the structural hash in bytes.
pub const MODEL_HASH_BYTES: usize = 8;

///
/// ModelHashParseError
///

#[derive(Debug, ThisError)]
pub enum ModelHashParseError {
    #[error("model hash must be 16 hex digits, found {0}")]
    InvalidLength(usize),

    #[error("model hash contains non-hex characters")]
    InvalidDigit,
}

///
/// ModelHash
///
/// Fixed-width structural hash identifying one model declaration.
/// Two declarations with the same name and field signature produce the
/// same hash; the registry is responsible for rejecting structural
/// mismatches behind one hash.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModelHash([u8; MODEL_HASH_BYTES]);

impl ModelHash {
    /// Compute the structural hash for `name` over the ordered field list.
    ///
    /// The encoding is canonical: name and each field's name + type token,
    /// separated by unambiguous delimiters. Declaration order is
    /// significant; nothing here depends on addresses or map iteration.
    #[must_use]
    pub fn compute(name: &str, fields: &[FieldModel]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0x00]);

        for field in fields {
            hasher.update(field.name().as_bytes());
            hasher.update([0x1f]);
            hasher.update(field.kind().type_token().as_bytes());
            hasher.update([0x00]);
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; MODEL_HASH_BYTES];
        bytes.copy_from_slice(&digest[..MODEL_HASH_BYTES]);

        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MODEL_HASH_BYTES] {
        &self.0
    }
}

impl Display for ModelHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ModelHash {
    type Err = ModelHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != MODEL_HASH_BYTES * 2 {
            return Err(ModelHashParseError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ModelHashParseError::InvalidDigit);
        }

        let mut bytes = [0u8; MODEL_HASH_BYTES];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let pair =
                std::str::from_utf8(chunk).map_err(|_| ModelHashParseError::InvalidDigit)?;
            bytes[i] =
                u8::from_str_radix(pair, 16).map_err(|_| ModelHashParseError::InvalidDigit)?;
        }

        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{FieldKind, FieldModel};

    fn fields() -> Vec<FieldModel> {
        vec![
            FieldModel::new("name", FieldKind::Text),
            FieldModel::new("ccy", FieldKind::Text),
        ]
    }

    #[test]
    fn identical_signatures_hash_identically() {
        assert_eq!(
            ModelHash::compute("Instrument", &fields()),
            ModelHash::compute("Instrument", &fields()),
        );
    }

    #[test]
    fn name_and_field_order_are_significant() {
        let reversed: Vec<FieldModel> = fields().into_iter().rev().collect();

        assert_ne!(
            ModelHash::compute("Instrument", &fields()),
            ModelHash::compute("Fund", &fields()),
        );
        assert_ne!(
            ModelHash::compute("Instrument", &fields()),
            ModelHash::compute("Instrument", &reversed),
        );
    }

    #[test]
    fn hash_display_round_trips_through_parse() {
        let hash = ModelHash::compute("Instrument", &fields());
        let text = hash.to_string();

        assert_eq!(text.len(), MODEL_HASH_BYTES * 2);
        let parsed: ModelHash = text.parse().expect("hex hash should parse");
        assert_eq!(parsed, hash);
    }

    #[test]
    fn malformed_hash_strings_are_rejected() {
        assert!("abc".parse::<ModelHash>().is_err());
        assert!("zzzzzzzzzzzzzzzz".parse::<ModelHash>().is_err());
    }
}
