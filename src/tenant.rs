//! Tenant identity and client connection URL types.
//!
//! A tenant is identified by a deterministic digest of its client database
//! URL. Both the identifier and the raw URL flow through every bounded
//! context, so they live at the crate root.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix shared by every tenant identifier.
pub const TENANT_ID_PREFIX: &str = "tenant_";

/// Number of hexadecimal characters following [`TENANT_ID_PREFIX`].
const TENANT_ID_HEX_LEN: usize = 16;

/// Errors returned while constructing tenant values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantDomainError {
    /// The identifier does not follow `tenant_` + 16 lowercase hex digits.
    #[error("invalid tenant identifier '{0}', expected tenant_ followed by 16 hex digits")]
    InvalidTenantId(String),

    /// The client database URL is empty after trimming.
    #[error("client database URL must not be empty")]
    EmptyDbUrl,
}

/// Deterministic tenant identifier derived from a client database URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Parses and validates a tenant identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError::InvalidTenantId`] when the value is not
    /// `tenant_` followed by exactly 16 lowercase hexadecimal digits.
    pub fn parse(value: impl Into<String>) -> Result<Self, TenantDomainError> {
        let raw = value.into();
        let is_valid = raw.strip_prefix(TENANT_ID_PREFIX).is_some_and(|suffix| {
            suffix.len() == TENANT_ID_HEX_LEN
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f'))
        });

        if !is_valid {
            return Err(TenantDomainError::InvalidTenantId(raw));
        }
        Ok(Self(raw))
    }

    /// Builds an identifier from the first 64 bits of a digest.
    #[must_use]
    pub fn from_digest_prefix(prefix: [u8; 8]) -> Self {
        Self(format!("{TENANT_ID_PREFIX}{}", hex::encode(prefix)))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

/// Client database connection URL.
///
/// The URL usually embeds credentials, so `Debug` and `Display` never print
/// it. Use [`DbUrl::expose`] at the points where the raw value is needed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbUrl(String);

impl DbUrl {
    /// Creates a connection URL, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError::EmptyDbUrl`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TenantDomainError::EmptyDbUrl);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the raw URL, credentials included.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DbUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DbUrl(<redacted>)")
    }
}

impl fmt::Display for DbUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
