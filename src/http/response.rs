//! Response building.
//!
//! # Responsibilities
//! - Binary success responses with sniffed content type and download headers
//! - JSON error envelopes (`{"status":"error","message":...}`)
//! - Mapping admission failures to status codes
//!
//! # Design Decisions
//! - The client file name is sanitized before it enters `Content-Disposition`
//! - Sniffing looks only at leading magic bytes

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform 401 message, whichever auth check failed.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid username and keys";

const FALLBACK_FILENAME: &str = "document.pdf";
const CACHE_CONTROL: &str = "private, no-transform, no-store, must-revalidate";

/// JSON body for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: String,
    pub message: String,
}

impl ResponseEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Request failures surfaced to the client.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("Content-Type application/json is required")]
    UnsupportedMediaType,

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Body read failure; the text is echoed verbatim as plain text.
    #[error("{0}")]
    BodyRead(String),

    /// JSON decode failure; the parser message is echoed verbatim.
    #[error("{0}")]
    MalformedPayload(String),

    #[error("document rendering failed")]
    RenderFailed,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::Unauthorized => StatusCode::UNAUTHORIZED,
            GateError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            GateError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GateError::BodyRead(_) | GateError::MalformedPayload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GateError::RenderFailed => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GateError::BodyRead(message) | GateError::MalformedPayload(message) => {
                (status, message).into_response()
            }
            other => (status, Json(ResponseEnvelope::error(other.to_string()))).into_response(),
        }
    }
}

/// Content type from leading magic bytes; text or empty input is plain text.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"%!PS-Adobe-", "application/postscript"),
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"PK\x03\x04", "application/zip"),
    ];

    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
        return *mime;
    }

    let head = &bytes[..bytes.len().min(512)];
    let binary = head
        .iter()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f));
    if binary {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Make a client-supplied name safe for `Content-Disposition`.
///
/// Control characters, non-ASCII, and header-significant punctuation are
/// replaced with `_`; path components are stripped.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '"' | ';' | ',' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let cleaned = cleaned.trim().trim_matches('.').to_string();
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// HTTP 200 carrying the rendered document (possibly empty).
pub fn document_response(bytes: Bytes, name: &str) -> Response {
    let filename = sanitize_filename(name);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = Response::new(Body::empty());
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(sniff_content_type(&bytes)),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        "content-transfer-encoding",
        HeaderValue::from_static("binary"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));

    *response.body_mut() = Body::from(bytes);
    response
}
