//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use topdf_gateway::conversion::ResolvedRenderOptions;
use topdf_gateway::render::{PdfEngine, RenderError, RenderResult};
use topdf_gateway::{HttpServer, ServiceConfig};

pub const SECRET: &str = "integration-secret";
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake document\n%%EOF";

/// Engine double that records every job it receives.
pub struct FakeEngine {
    fail: bool,
    calls: AtomicUsize,
    last: Mutex<Option<(String, ResolvedRenderOptions)>>,
}

#[allow(dead_code)]
impl FakeEngine {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_job(&self) -> Option<(String, ResolvedRenderOptions)> {
        self.last.lock().unwrap().clone()
    }
}

impl PdfEngine for FakeEngine {
    fn render(&self, html: &str, options: &ResolvedRenderOptions) -> RenderResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((html.to_string(), options.clone()));
        if self.fail {
            Err(RenderError::Failed {
                status: "exit status: 1".into(),
                stderr: "Exit with code 1 due to network error".into(),
            })
        } else {
            Ok(FAKE_PDF.to_vec())
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Default config with the test secret installed.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.auth.shared_secret = Base64.encode(SECRET);
    config
}

pub fn app(config: ServiceConfig, engine: Arc<FakeEngine>) -> Router {
    HttpServer::new(config, engine).unwrap().router()
}

pub fn basic_auth(credential: &str) -> String {
    format!("Basic {}", Base64.encode(credential))
}

/// JSON body for a conversion of `html` with extra option fields merged in.
#[allow(dead_code)]
pub fn payload(html: &str, name: &str, options: serde_json::Value) -> String {
    let mut body = serde_json::json!({
        "html": Base64.encode(html),
        "name": name,
    });
    if let (Some(body), Some(options)) = (body.as_object_mut(), options.as_object()) {
        for (k, v) in options {
            body.insert(k.clone(), v.clone());
        }
    }
    body.to_string()
}

/// Authenticated JSON conversion request.
#[allow(dead_code)]
pub fn convert_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/api/topdf")
        .header(header::AUTHORIZATION, basic_auth(SECRET))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
