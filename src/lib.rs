//! HTML-to-PDF conversion gateway library.

pub mod config;
pub mod conversion;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
