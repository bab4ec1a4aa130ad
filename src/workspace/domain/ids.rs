//! Value types stored on a workspace.

use super::WorkspaceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const CHECKSUM_HEX_LEN: usize = 64;

/// Lowercase hex digest of a canonical schema serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Validates a persisted or computed checksum.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidChecksum`] unless the value is
    /// exactly 64 lowercase hexadecimal characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        let is_valid = raw.len() == CHECKSUM_HEX_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f'));
        if !is_valid {
            return Err(WorkspaceDomainError::InvalidChecksum(raw));
        }
        Ok(Self(raw))
    }

    /// Builds a checksum from a 256-bit digest.
    #[must_use]
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Returns the checksum as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Checksum {
    type Error = WorkspaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Checksum> for String {
    fn from(value: Checksum) -> Self {
        value.0
    }
}

/// Opaque ciphertext of a client database URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncryptedDbUrl(String);

impl EncryptedDbUrl {
    /// Wraps ciphertext produced by a URL cipher.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::EmptyEncryptedDbUrl`] for empty input.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(WorkspaceDomainError::EmptyEncryptedDbUrl);
        }
        Ok(Self(raw))
    }

    /// Returns the ciphertext.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EncryptedDbUrl {
    type Error = WorkspaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EncryptedDbUrl> for String {
    fn from(value: EncryptedDbUrl) -> Self {
        value.0
    }
}
