//! Account identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An opaque account identifier (in practice a chain address such as `0x5b38…`).
///
/// Two accounts are the same holder iff their identifiers are equal. The type is
/// totally ordered so snapshots and listings can be emitted deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Longest accepted identifier in bytes (LMDB's default maximum key size).
    pub const MAX_LEN: usize = 511;

    /// Wrap a raw identifier without validation. See [`AccountId::validate`].
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse user input: surrounding whitespace is trimmed, then the result
    /// must pass [`AccountId::validate`].
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let id = Self(raw.trim().to_string());
        id.validate()?;
        Ok(id)
    }

    /// Check the identifier can be stored: non-empty and at most
    /// [`AccountId::MAX_LEN`] bytes. Any other content is opaque and kept
    /// byte for byte.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.0.is_empty() {
            return Err(TypesError::InvalidAccount("account id must not be empty".into()));
        }
        if self.0.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidAccount(format!(
                "account id is {} bytes, maximum is {}",
                self.0.len(),
                Self::MAX_LEN
            )));
        }
        Ok(())
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
