//! Port for symmetric encryption of client database URLs.

use crate::tenant::DbUrl;
use crate::workspace::domain::EncryptedDbUrl;
use thiserror::Error;

/// Reversible URL encryption.
///
/// `decrypt(encrypt(url))` yields `url` for every ciphertext produced by the
/// same key.
pub trait UrlCipher: Send + Sync {
    /// Encrypts a URL.
    ///
    /// # Errors
    ///
    /// Returns [`UrlCipherError::Encrypt`] when the cipher fails.
    fn encrypt(&self, url: &DbUrl) -> Result<EncryptedDbUrl, UrlCipherError>;

    /// Decrypts a stored ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`UrlCipherError::Decrypt`] when the ciphertext is malformed
    /// or was produced with another key.
    fn decrypt(&self, encrypted: &EncryptedDbUrl) -> Result<DbUrl, UrlCipherError>;
}

/// Errors returned by URL cipher implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlCipherError {
    /// Key material is unusable.
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("failed to encrypt client database URL: {0}")]
    Encrypt(String),

    /// Decryption failed.
    #[error("failed to decrypt client database URL: {0}")]
    Decrypt(String),
}
