//! Conversion request payload.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// JSON body of `POST /v1/api/topdf`.
///
/// Numeric options treat `0` the same as absent; flags are tri-state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionRequest {
    /// Base64-encoded HTML markup.
    pub html: String,
    /// File name for `Content-Disposition`.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nocollate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dpi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<bool>,
}

impl ConversionRequest {
    /// Decode `html`. Invalid base64 or non-UTF-8 content yields an empty
    /// document rather than an error.
    pub fn decode_html(&self) -> String {
        if self.html.is_empty() {
            return String::new();
        }

        let decoded = match Base64.decode(&self.html) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "html payload is not valid base64");
                return String::new();
            }
        };

        String::from_utf8(decoded).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "html payload is not valid UTF-8");
            String::new()
        })
    }
}
