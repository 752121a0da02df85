//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! decoded html + ResolvedRenderOptions
//!     → adapter.rs (spawn_blocking, metrics)
//!     → engine.rs (PdfEngine trait)
//!     → wkhtmltopdf.rs (stdin → process → stdout)
//!     → PDF bytes or RenderError
//! ```
//!
//! # Design Decisions
//! - The engine is synchronous and opaque behind `PdfEngine`
//! - The adapter always reports failures; the HTTP layer decides whether to hide them

pub mod adapter;
pub mod engine;
pub mod wkhtmltopdf;

pub use adapter::RenderAdapter;
pub use engine::{PdfEngine, RenderError, RenderResult};
pub use wkhtmltopdf::WkhtmltopdfEngine;
