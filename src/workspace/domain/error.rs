//! Error types for workspace domain validation.

use thiserror::Error;

/// Errors returned while constructing workspace values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The checksum is not 64 lowercase hexadecimal characters.
    #[error("invalid schema checksum '{0}', expected 64 lowercase hex digits")]
    InvalidChecksum(String),

    /// The encrypted connection URL is empty.
    #[error("encrypted client database URL must not be empty")]
    EmptyEncryptedDbUrl,
}
