//! Request body size ceiling.
//!
//! The body is read at most once, through a length-limited wrapper, so an
//! oversized or slow upload never grows memory past the configured ceiling.

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    /// Message text mirrors the legacy service's error body.
    #[error("http: request body too large")]
    TooLarge { limit: usize },

    #[error("{0}")]
    Read(String),
}

/// Collect `body`, failing as soon as more than `limit` bytes arrive.
pub async fn read_limited(body: Body, limit: usize) -> Result<Bytes, BodyError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge { limit })
        }
        Err(err) => Err(BodyError::Read(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_body_within_limit() {
        let bytes = read_limited(Body::from("0123456789"), 10).await.unwrap();
        assert_eq!(&bytes[..], b"0123456789");
    }

    #[tokio::test]
    async fn test_rejects_body_over_limit() {
        let err = read_limited(Body::from("0123456789A"), 10).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 10 }));
        assert_eq!(err.to_string(), "http: request body too large");
    }
}
