//! Rendering engine contract and errors.

use thiserror::Error;

use crate::conversion::ResolvedRenderOptions;

/// Errors produced while driving the rendering engine.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Engine process could not be started.
    #[error("failed to start rendering engine: {0}")]
    Spawn(#[source] std::io::Error),

    /// Piping input to, or reading output from, the engine failed.
    #[error("rendering engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine exited unsuccessfully.
    #[error("rendering engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// Engine reported success but produced no bytes.
    #[error("rendering engine produced no output")]
    EmptyOutput,

    /// Blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Join(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// An opaque, synchronous HTML-to-PDF converter.
///
/// Implementations may block; callers run them off the async executor.
pub trait PdfEngine: Send + Sync {
    /// Render a single page built from `html` with `options` applied.
    fn render(&self, html: &str, options: &ResolvedRenderOptions) -> RenderResult<Vec<u8>>;

    /// Engine name for logs and metrics.
    fn name(&self) -> &'static str;
}
