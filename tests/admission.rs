//! End-to-end admission pipeline tests against the router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use topdf_gateway::conversion::{Orientation, PageSize};
use topdf_gateway::http::ResponseEnvelope;
use tower::ServiceExt;

mod common;

use common::{app, basic_auth, body_bytes, convert_request, payload, test_config, FakeEngine};

fn ping_request(client: &str) -> Request<Body> {
    Request::builder()
        .uri("/ping")
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_ping_needs_no_auth() {
    let app = app(test_config(), FakeEngine::succeeding());
    let response = app.oneshot(ping_request("198.51.100.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-ratelimit-limit"], "100");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "99");
    assert_eq!(body_bytes(response).await, "Pong(🏓)!".as_bytes());
}

#[tokio::test]
async fn test_valid_conversion_returns_pdf() {
    let engine = FakeEngine::succeeding();
    let app = app(test_config(), engine.clone());

    let body = payload("<h1>Invoice</h1>", "invoice.pdf", json!({ "margin_top": 20 }));
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment; filename=\"invoice.pdf\"");
    assert_eq!(headers[header::CONTENT_LENGTH], common::FAKE_PDF.len().to_string());
    assert_eq!(headers[header::EXPIRES], "0");
    assert_eq!(headers["content-transfer-encoding"], "binary");
    assert_eq!(body_bytes(response).await, common::FAKE_PDF);

    let (html, options) = engine.last_job().unwrap();
    assert_eq!(html, "<h1>Invoice</h1>");
    assert_eq!(options.page_size, PageSize::A4);
    assert_eq!(options.orientation, Orientation::Portrait);
    assert_eq!(options.dpi, 350);
    assert_eq!(options.margin_top, Some(20));
    assert_eq!(options.margin_right, Some(20));
}

#[tokio::test]
async fn test_unknown_options_fall_back_to_defaults() {
    let engine = FakeEngine::succeeding();
    let app = app(test_config(), engine.clone());

    let body = payload(
        "<p>x</p>",
        "x.pdf",
        json!({ "page_size": "Napkin", "orientation": "diagonal", "dpi": 0 }),
    );
    let response = app.oneshot(convert_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, options) = engine.last_job().unwrap();
    assert_eq!(options.page_size, PageSize::A4);
    assert_eq!(options.orientation, Orientation::Portrait);
    assert_eq!(options.dpi, 350);
}

#[tokio::test]
async fn test_wrong_credential_is_rejected_uniformly() {
    let engine = FakeEngine::succeeding();
    let app = app(test_config(), engine.clone());
    let body = payload("<p>x</p>", "x.pdf", json!({}));

    let wrong = Request::builder()
        .method("POST")
        .uri("/v1/api/topdf")
        .header(header::AUTHORIZATION, basic_auth("not-the-secret"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.clone()))
        .unwrap();
    let missing = Request::builder()
        .method("POST")
        .uri("/v1/api/topdf")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let wrong = app.clone().oneshot(wrong).await.unwrap();
    let missing = app.oneshot(missing).await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong: ResponseEnvelope = serde_json::from_slice(&body_bytes(wrong).await).unwrap();
    let missing: ResponseEnvelope = serde_json::from_slice(&body_bytes(missing).await).unwrap();
    assert_eq!(wrong.status, "error");
    assert_eq!(wrong, missing);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_auth_is_checked_before_content_type() {
    let app = app(test_config(), FakeEngine::succeeding());
    let request = Request::builder()
        .method("POST")
        .uri("/v1/api/topdf")
        .header(header::CONTENT_TYPE, "text/html")
        .body(Body::from("<p>x</p>"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_json_content_type_is_415() {
    let app = app(test_config(), FakeEngine::succeeding());
    let mut request = convert_request(payload("<p>x</p>", "x.pdf", json!({})));
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let envelope: ResponseEnvelope = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(envelope.status, "error");
}

#[tokio::test]
async fn test_content_type_is_case_insensitive() {
    let app = app(test_config(), FakeEngine::succeeding());
    let mut request = convert_request(payload("<p>x</p>", "x.pdf", json!({})));
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, "Application/JSON".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_never_reaches_renderer() {
    let engine = FakeEngine::succeeding();
    let mut config = test_config();
    config.limits.max_body_bytes = 64;
    let app = app(config, engine.clone());

    let body = payload(&"x".repeat(256), "big.pdf", json!({}));
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(response).await, b"http: request body too large");
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_413_without_legacy_status() {
    let engine = FakeEngine::succeeding();
    let mut config = test_config();
    config.limits.max_body_bytes = 64;
    config.compat.body_too_large_as_500 = false;
    let app = app(config, engine.clone());

    let body = payload(&"x".repeat(256), "big.pdf", json!({}));
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_echoes_parser_error() {
    let engine = FakeEngine::succeeding();
    let app = app(test_config(), engine.clone());

    let response = app.oneshot(convert_request("{\"html\": ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("EOF"), "unexpected body: {}", text);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_undecodable_html_renders_empty_document() {
    let engine = FakeEngine::succeeding();
    let app = app(test_config(), engine.clone());

    let body = json!({ "html": "@@not-base64@@", "name": "x.pdf" }).to_string();
    let response = app.oneshot(convert_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (html, _) = engine.last_job().unwrap();
    assert_eq!(html, "");
}

#[tokio::test]
async fn test_render_failure_is_empty_200_in_legacy_mode() {
    let engine = FakeEngine::failing();
    let app = app(test_config(), engine.clone());

    let response = app
        .oneshot(convert_request(payload("<p>x</p>", "x.pdf", json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "0");
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_render_failure_is_502_when_not_swallowed() {
    let mut config = test_config();
    config.compat.swallow_render_failures = false;
    let app = app(config, FakeEngine::failing());

    let response = app
        .oneshot(convert_request(payload("<p>x</p>", "x.pdf", json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let envelope: ResponseEnvelope = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!envelope.message.contains("network error"));
}

#[tokio::test]
async fn test_independent_right_margin() {
    let engine = FakeEngine::succeeding();
    let mut config = test_config();
    config.compat.mirror_margin_right = false;
    let app = app(config, engine.clone());

    let body = payload("<p>x</p>", "x.pdf", json!({ "margin_top": 20, "margin_right": 3 }));
    app.oneshot(convert_request(body)).await.unwrap();

    let (_, options) = engine.last_job().unwrap();
    assert_eq!(options.margin_top, Some(20));
    assert_eq!(options.margin_right, Some(3));
}

#[tokio::test]
async fn test_filename_is_sanitized() {
    let app = app(test_config(), FakeEngine::succeeding());
    let body = payload("<p>x</p>", "x.pdf\r\nX-Injected: 1", json!({}));

    let response = app.oneshot(convert_request(body)).await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"x.pdf__X-Injected: 1\""
    );
    assert!(!response.headers().contains_key("x-injected"));
}

#[tokio::test]
async fn test_rate_limit_rejects_request_101() {
    // Quota stays at 100; a long window keeps slow runners inside it.
    let mut config = test_config();
    config.rate_limit.window_secs = 60;
    let app = app(config, FakeEngine::succeeding());

    for i in 1..=100 {
        let response = app.clone().oneshot(ping_request("203.0.113.9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {} should pass", i);
    }

    let response = app.clone().oneshot(ping_request("203.0.113.9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "0");

    let other = app.oneshot(ping_request("203.0.113.10")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_applies_before_auth() {
    let mut config = test_config();
    config.rate_limit.requests_per_window = 1;
    let engine = FakeEngine::succeeding();
    let app = app(config, engine.clone());

    let first = app.clone().oneshot(ping_request("192.0.2.5")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let mut request = convert_request(payload("<p>x</p>", "x.pdf", json!({})));
    request
        .headers_mut()
        .insert("x-forwarded-for", "192.0.2.5".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_disabled_rate_limit_omits_headers() {
    let mut config = test_config();
    config.rate_limit.enabled = false;
    let app = app(config, FakeEngine::succeeding());

    let response = app.oneshot(ping_request("192.0.2.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-ratelimit-limit"));
}
