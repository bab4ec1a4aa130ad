//! XChaCha20-Poly1305 URL encryption.
//!
//! Ciphertext layout: base64 (standard alphabet) of a random 24-byte nonce
//! followed by the sealed URL bytes.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use rand::Rng;
use std::fmt;

use crate::tenant::DbUrl;
use crate::workspace::{
    domain::EncryptedDbUrl,
    ports::{UrlCipher, UrlCipherError},
};

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 24;

/// [`UrlCipher`] sealing URLs with XChaCha20-Poly1305.
#[derive(Clone)]
pub struct XChaChaUrlCipher {
    cipher: XChaCha20Poly1305,
}

impl XChaChaUrlCipher {
    /// Creates a cipher from raw key bytes.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(key.into()),
        }
    }

    /// Creates a cipher from a base64-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`UrlCipherError::InvalidKey`] when the value is not valid
    /// base64 or does not decode to exactly 32 bytes.
    pub fn from_base64_key(encoded: &str) -> Result<Self, UrlCipherError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|err| UrlCipherError::InvalidKey(err.to_string()))?;
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|raw: Vec<u8>| {
            UrlCipherError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", raw.len()))
        })?;
        Ok(Self::new(&key))
    }
}

impl fmt::Debug for XChaChaUrlCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XChaChaUrlCipher(<key redacted>)")
    }
}

impl UrlCipher for XChaChaUrlCipher {
    fn encrypt(&self, url: &DbUrl) -> Result<EncryptedDbUrl, UrlCipherError> {
        let mut nonce = [0_u8; NONCE_LEN];
        rand::thread_rng().fill(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), url.expose().as_bytes())
            .map_err(|err| UrlCipherError::Encrypt(err.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&sealed);
        EncryptedDbUrl::new(STANDARD.encode(payload))
            .map_err(|err| UrlCipherError::Encrypt(err.to_string()))
    }

    fn decrypt(&self, encrypted: &EncryptedDbUrl) -> Result<DbUrl, UrlCipherError> {
        let payload = STANDARD
            .decode(encrypted.as_str())
            .map_err(|err| UrlCipherError::Decrypt(err.to_string()))?;
        let (nonce, sealed) = payload
            .split_at_checked(NONCE_LEN)
            .ok_or_else(|| UrlCipherError::Decrypt("ciphertext shorter than nonce".to_owned()))?;

        let plain = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|err| UrlCipherError::Decrypt(err.to_string()))?;
        let url =
            String::from_utf8(plain).map_err(|err| UrlCipherError::Decrypt(err.to_string()))?;
        DbUrl::new(url).map_err(|err| UrlCipherError::Decrypt(err.to_string()))
    }
}
