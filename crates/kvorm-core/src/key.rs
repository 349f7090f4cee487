use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// KeyParseError
///

#[derive(Debug, ThisError)]
pub enum KeyParseError {
    #[error("invalid primary key: {0}")]
    InvalidNumber(ParseIntError),
}

///
/// Key
///
/// Backend-assigned primary key for one stored record.
///
/// Keys are plain integers; cross-model uniqueness is provided by the
/// identity token (model hash + key), never by the key alone.
///

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Key(u64);

impl Key {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(KeyParseError::InvalidNumber)
    }
}
