//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the conversion and liveness handlers
//! - Wire up middleware (rate limit, tracing, request ID)
//! - Bind server to listener with peer-address info
//! - Run background sweeping of rate-limit windows
//! - Graceful shutdown on the lifecycle signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{CompatConfig, LimitsConfig, ServiceConfig};
use crate::http::handlers::{convert, ping, PING_PATH, TOPDF_PATH};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::render::{PdfEngine, RenderAdapter};
use crate::security::rate_limit::{rate_limit_middleware, run_sweeper, RateLimiter};
use crate::security::{CredentialError, CredentialStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub renderer: RenderAdapter,
    pub limits: LimitsConfig,
    pub compat: CompatConfig,
}

/// HTTP server for the conversion gateway.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server. Fails if the configured secret is unusable.
    pub fn new(config: ServiceConfig, engine: Arc<dyn PdfEngine>) -> Result<Self, CredentialError> {
        let credentials = Arc::new(CredentialStore::from_encoded(&config.auth.shared_secret)?);

        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::from_config(&config.rate_limit)));

        let state = AppState {
            credentials,
            renderer: RenderAdapter::new(engine),
            limits: config.limits.clone(),
            compat: config.compat.clone(),
        };

        let router = build_router(state, limiter.clone());
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_body_bytes = self.config.limits.max_body_bytes,
            rate_limited = self.limiter.is_some(),
            "HTTP server starting"
        );

        let sweeper = self.limiter.as_ref().map(|limiter| {
            let interval = Duration::from_secs(self.config.rate_limit.sweep_interval_secs);
            tokio::spawn(run_sweeper(limiter.clone(), interval, shutdown.resubscribe()))
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        // The sweeper may have subscribed after the signal was sent.
        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState, limiter: Option<Arc<RateLimiter>>) -> Router {
    let mut router = Router::new()
        .route(TOPDF_PATH, post(convert))
        .route(PING_PATH, get(ping))
        .with_state(state);

    if let Some(limiter) = limiter {
        router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
