//! Route handlers.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::conversion::{ConversionRequest, MarginPolicy, ResolvedRenderOptions};
use crate::http::request::request_id;
use crate::http::response::{document_response, GateError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{check_basic, read_limited, BodyError};

pub const TOPDF_PATH: &str = "/v1/api/topdf";
pub const PING_PATH: &str = "/ping";

/// Literal liveness reply.
pub const PONG: &str = "Pong(🏓)!";

pub async fn ping() -> &'static str {
    PONG
}

/// `POST /v1/api/topdf`: admission gate, option resolution, render.
pub async fn convert(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    let response = match admit_and_render(&state, &parts.headers, body, &request_id).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                status = %err.status(),
                error = %err,
                "Conversion request rejected"
            );
            err.into_response()
        }
    };

    metrics::record_request(TOPDF_PATH, response.status().as_u16(), start);
    response
}

/// Runs the checks in order, stopping at the first failure. The body is
/// consumed at most once and dropped on every path.
async fn admit_and_render(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
    request_id: &str,
) -> Result<Response, GateError> {
    if let Err(reason) = check_basic(headers, &state.credentials) {
        tracing::debug!(request_id = %request_id, reason = %reason, "Authentication failed");
        return Err(GateError::Unauthorized);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.eq_ignore_ascii_case("application/json") {
        return Err(GateError::UnsupportedMediaType);
    }

    let raw = read_limited(body, state.limits.max_body_bytes)
        .await
        .map_err(|err| match err {
            BodyError::TooLarge { limit } if !state.compat.body_too_large_as_500 => {
                GateError::PayloadTooLarge { limit }
            }
            other => GateError::BodyRead(other.to_string()),
        })?;

    let payload: ConversionRequest = serde_json::from_slice(&raw)
        .map_err(|e| GateError::MalformedPayload(e.to_string()))?;
    drop(raw);

    let margins = if state.compat.mirror_margin_right {
        MarginPolicy::MirrorTop
    } else {
        MarginPolicy::Independent
    };
    let options = ResolvedRenderOptions::resolve(&payload, margins);
    let html = payload.decode_html();

    tracing::debug!(
        request_id = %request_id,
        page_size = %options.page_size,
        orientation = %options.orientation,
        dpi = options.dpi,
        html_bytes = html.len(),
        "Rendering document"
    );

    let document = match state.renderer.render(html, options).await {
        Ok(bytes) => bytes,
        Err(err) if state.compat.swallow_render_failures => {
            // Legacy contract: failure is indistinguishable from empty output.
            tracing::error!(
                request_id = %request_id,
                engine = state.renderer.engine_name(),
                error = %err,
                "Rendering failed, returning empty document"
            );
            Bytes::new()
        }
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                engine = state.renderer.engine_name(),
                error = %err,
                "Rendering failed"
            );
            return Err(GateError::RenderFailed);
        }
    };

    tracing::info!(
        request_id = %request_id,
        file = %payload.name,
        size = document.len(),
        "Document generated"
    );

    Ok(document_response(document, &payload.name))
}
