//! Credential encryption.
//!
//! Stored values are `base64(nonce || ciphertext || tag)` produced by
//! AES-256-GCM with a 96-bit nonce; the key is the SHA-256 digest of the
//! configured passphrase.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::{Result, SiteAccError};
use crate::site::TestClientCredentials;

const NONCE_LEN: usize = 12;

/// Decrypted test-client credentials of a site.
#[derive(Clone, PartialEq, Eq)]
pub struct SiteCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SiteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"*****")
            .finish()
    }
}

impl TestClientCredentials {
    /// Decrypt both stored values.
    pub fn decrypt(&self, passphrase: &str) -> Result<SiteCredentials> {
        Ok(SiteCredentials {
            client_id: decrypt_credential(&self.id, passphrase)?,
            client_secret: decrypt_credential(&self.secret, passphrase)?,
        })
    }
}

fn cipher_for(passphrase: &str) -> Result<Aes256Gcm> {
    let key = Sha256::digest(passphrase.as_bytes());
    Aes256Gcm::new_from_slice(&key).map_err(|e| SiteAccError::Decrypt(e.to_string()))
}

/// Decrypt one stored credential value.
pub fn decrypt_credential(encoded: &str, passphrase: &str) -> Result<String> {
    let data = BASE64
        .decode(encoded.trim())
        .map_err(|e| SiteAccError::Decrypt(format!("invalid base64: {e}")))?;

    if data.len() <= NONCE_LEN {
        return Err(SiteAccError::Decrypt("ciphertext too short".to_string()));
    }

    let (nonce, ciphertext) = data.split_at(NONCE_LEN);
    let plaintext = cipher_for(passphrase)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SiteAccError::Decrypt("authentication failed".to_string()))?;

    String::from_utf8(plaintext).map_err(|e| SiteAccError::Decrypt(e.to_string()))
}

/// Encrypt a credential value in the stored format.
pub fn encrypt_credential(plaintext: &str, passphrase: &str) -> Result<String> {
    let cipher = cipher_for(passphrase)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| SiteAccError::Decrypt(e.to_string()))?;

    let mut data = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    data.extend_from_slice(&nonce);
    data.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(data))
}
