//! Shared-secret credential store.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("shared secret is not valid base64")]
    InvalidEncoding,
    #[error("shared secret is empty")]
    Empty,
}

/// The single static secret, decoded once at startup and never mutated.
#[derive(Clone)]
pub struct CredentialStore {
    secret: Vec<u8>,
}

impl CredentialStore {
    /// Build from the base64-encoded form (`X_KEY`). The decoded value is
    /// whitespace-trimmed, matching how presented credentials are trimmed.
    pub fn from_encoded(encoded: &str) -> Result<Self, CredentialError> {
        let decoded = Base64
            .decode(encoded.trim())
            .map_err(|_| CredentialError::InvalidEncoding)?;
        let text = String::from_utf8_lossy(&decoded);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self {
            secret: trimmed.as_bytes().to_vec(),
        })
    }

    /// Constant-time comparison against the stored secret.
    pub fn verify(&self, presented: &[u8]) -> bool {
        !presented.is_empty() && bool::from(self.secret.as_slice().ct_eq(presented))
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("secret", &"<redacted>")
            .finish()
    }
}
