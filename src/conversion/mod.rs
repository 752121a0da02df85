//! Conversion payload handling.
//!
//! # Data Flow
//! ```text
//! request body (JSON)
//!     → request.rs (ConversionRequest, base64 html decode)
//!     → options.rs (closed-set validation, defaults)
//!     → ResolvedRenderOptions → render adapter
//! ```

pub mod options;
pub mod request;

pub use options::{MarginPolicy, Orientation, PageSize, ResolvedRenderOptions, DEFAULT_DPI};
pub use request::ConversionRequest;
