//! Async bridge to a blocking [`PdfEngine`].

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use crate::conversion::ResolvedRenderOptions;
use crate::observability::metrics;
use crate::render::engine::{PdfEngine, RenderError, RenderResult};

/// Runs engine jobs on the blocking pool and records render metrics.
#[derive(Clone)]
pub struct RenderAdapter {
    engine: Arc<dyn PdfEngine>,
}

impl RenderAdapter {
    pub fn new(engine: Arc<dyn PdfEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Render `html` to completion. Not cancellable once started.
    pub async fn render(&self, html: String, options: ResolvedRenderOptions) -> RenderResult<Bytes> {
        let engine = self.engine.clone();
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || engine.render(&html, &options))
            .await
            .map_err(|e| RenderError::Join(e.to_string()))
            .and_then(|inner| inner);

        match &result {
            Ok(bytes) => metrics::record_render("success", start, bytes.len()),
            Err(_) => metrics::record_render("failure", start, 0),
        }

        result.map(Bytes::from)
    }
}
