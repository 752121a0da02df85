//! Configuration validation.
//!
//! Semantic checks that serde cannot express. All failures are collected
//! so a misconfigured deployment sees every problem at once.

use std::net::SocketAddr;

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("shared secret is not set (X_KEY)")]
    MissingSecret,

    #[error("shared secret is not valid base64")]
    SecretNotBase64,

    #[error("shared secret decodes to empty text")]
    EmptySecret,

    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("rate_limit.{0} must be greater than zero")]
    ZeroRateLimit(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("engine.binary must not be empty")]
    MissingEngineBinary,

    #[error("invalid metrics address: {0}")]
    MetricsAddress(String),
}

/// Validate a loaded configuration, returning every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let secret = config.auth.shared_secret.trim();
    if secret.is_empty() {
        errors.push(ValidationError::MissingSecret);
    } else {
        match Base64.decode(secret) {
            Ok(decoded) if String::from_utf8_lossy(&decoded).trim().is_empty() => {
                errors.push(ValidationError::EmptySecret);
            }
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::SecretNotBase64),
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_window == 0 {
            errors.push(ValidationError::ZeroRateLimit("requests_per_window"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::ZeroRateLimit("window_secs"));
        }
        if config.rate_limit.sweep_interval_secs == 0 {
            errors.push(ValidationError::ZeroRateLimit("sweep_interval_secs"));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.engine.binary.trim().is_empty() {
        errors.push(ValidationError::MissingEngineBinary);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
