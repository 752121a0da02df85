//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → security::rate_limit (429 short-circuit)
//!     → handlers.rs (admission gate → resolve → render)
//!     → response.rs (document or error envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{GateError, ResponseEnvelope};
pub use server::{build_router, AppState, HttpServer};
