//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-client fixed window, every route)
//!     → auth.rs + credentials.rs (shared secret, conversion route only)
//!     → limits.rs (bounded body read)
//!     → Pass to conversion
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Uniform 401 body regardless of which auth check failed
//! - The secret is decoded once at startup and injected, never read from env per request

pub mod auth;
pub mod credentials;
pub mod limits;
pub mod rate_limit;

pub use auth::{check_basic, AuthError};
pub use credentials::{CredentialError, CredentialStore};
pub use limits::{read_limited, BodyError};
pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
