//! Instance identity tokens.
//!
//! A persisted instance is addressable by `<model-hash>.<primary-key>`.
//! The hash prefix keeps tokens collision-free across models: two models'
//! record 5 and record 5 never share a token.

use crate::{
    instance::{Instance, Lifecycle},
    key::{Key, KeyParseError},
    model::hash::{ModelHash, ModelHashParseError},
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// IdentityError
///

#[derive(Debug, ThisError)]
pub enum IdentityError {
    /// The instance is not currently addressable: never saved, or deleted.
    #[error("instance of model '{model}' is not persisted (state: {state})")]
    NotPersisted { model: String, state: Lifecycle },

    #[error("identity token missing '.' separator")]
    MissingSeparator,

    #[error(transparent)]
    InvalidHash(#[from] ModelHashParseError),

    #[error(transparent)]
    InvalidKey(#[from] KeyParseError),
}

///
/// IdentityToken
///
/// Canonical cross-model handle for one persisted record.
/// Defined only while the instance is in the Persisted state.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IdentityToken {
    model: ModelHash,
    key: Key,
}

impl IdentityToken {
    #[must_use]
    pub const fn new(model: ModelHash, key: Key) -> Self {
        Self { model, key }
    }

    #[must_use]
    pub const fn model(&self) -> ModelHash {
        self.model
    }

    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }
}

impl Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.key)
    }
}

impl FromStr for IdentityToken {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (model, key) = s.split_once('.').ok_or(IdentityError::MissingSeparator)?;

        Ok(Self {
            model: model.parse()?,
            key: key.parse()?,
        })
    }
}

impl Instance {
    /// Identity token for this instance.
    ///
    /// Fails for New and Deleted instances alike: both represent "not
    /// currently addressable", never a placeholder token.
    pub fn identity(&self) -> Result<IdentityToken, IdentityError> {
        let not_persisted = || IdentityError::NotPersisted {
            model: self.meta().name().to_string(),
            state: self.state(),
        };

        if self.state() != Lifecycle::Persisted {
            return Err(not_persisted());
        }
        let key = self.key().ok_or_else(not_persisted)?;

        Ok(IdentityToken::new(self.meta().hash(), key))
    }
}
