//! Startup orchestration.
//!
//! Configuration first, then observability, then the engine and server,
//! and the listener last. Any failure here is fatal to the process.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::render::WkhtmltopdfEngine;
use crate::security::CredentialError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("logging error: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load `.env` if present. A missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

/// Load configuration and run the service until a termination signal.
pub async fn run(config_path: Option<&Path>) -> Result<(), StartupError> {
    load_dotenv();
    let config = load_config(config_path)?;
    logging::init_logging(&config.observability)?;

    tracing::info!("topdf-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    serve(config).await
}

/// Start metrics, bind the listener and serve `config`.
pub async fn serve(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        engine = %config.engine.binary,
        requests_per_window = config.rate_limit.requests_per_window,
        window_secs = config.rate_limit.window_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already validated by the config loader.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let engine = Arc::new(WkhtmltopdfEngine::from_config(&config.engine));
    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let server = HttpServer::new(config, engine)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
