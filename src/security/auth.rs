//! HTTP Basic-style shared-secret authentication.
//!
//! The token after `Basic ` is base64 of the credential itself; there is no
//! user/password split. Every failure mode maps to one uniform response so a
//! caller cannot learn which check failed.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use thiserror::Error;

use crate::security::credentials::CredentialStore;

/// Why authentication failed. Only logged, never sent to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    Missing,
    #[error("malformed Authorization header")]
    Malformed,
    #[error("credential mismatch")]
    Mismatch,
}

/// Validate the `Authorization` header against the credential store.
pub fn check_basic(headers: &HeaderMap, store: &CredentialStore) -> Result<(), AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().ok_or(AuthError::Malformed)?;
    if scheme != "Basic" {
        return Err(AuthError::Malformed);
    }

    // Undecodable tokens compare as empty, which never verifies.
    let decoded = Base64.decode(token.trim()).unwrap_or_default();
    let presented = String::from_utf8_lossy(&decoded);

    if store.verify(presented.trim().as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::Mismatch)
    }
}
