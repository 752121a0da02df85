//! Fixed-window rate limiting per client identity.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Request count for one identity within the current window.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    started: Instant,
    count: u32,
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_after: Duration,
}

/// In-memory fixed-window limiter. Windows are not persisted.
pub struct RateLimiter {
    windows: DashMap<String, WindowCounter>,
    limit: u32,
    window: Duration,
    trust_forward_header: bool,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
            trust_forward_header: true,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        let mut limiter = Self::new(
            config.requests_per_window,
            Duration::from_secs(config.window_secs),
        );
        limiter.trust_forward_header = config.trust_forward_header;
        limiter
    }

    pub fn admit(&self, identity: &str) -> Decision {
        self.admit_at(identity, Instant::now())
    }

    /// Count one request for `identity` at `now`.
    pub fn admit_at(&self, identity: &str, now: Instant) -> Decision {
        let mut entry = self
            .windows
            .entry(identity.to_string())
            .or_insert(WindowCounter { started: now, count: 0 });

        let counter = entry.value_mut();
        if now.saturating_duration_since(counter.started) >= self.window {
            counter.started = now;
            counter.count = 0;
        }
        counter.count = counter.count.saturating_add(1);

        let elapsed = now.saturating_duration_since(counter.started);
        Decision {
            allowed: counter.count <= self.limit,
            limit: self.limit,
            remaining: self.limit.saturating_sub(counter.count),
            reset_after: self.window.saturating_sub(elapsed),
        }
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub fn prune_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.windows.retain(|_, counter| {
            let live = now.saturating_duration_since(counter.started) < self.window;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    /// Derive the client identity for `headers` and the transport peer.
    pub fn identity(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        client_identity(headers, peer, self.trust_forward_header)
    }
}

/// First `X-Forwarded-For` entry, then `X-Real-IP`, then the peer IP.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forward: bool) -> String {
    let forwarded = || {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
    };

    trust_forward
        .then(forwarded)
        .flatten()
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Periodically prune expired windows until `shutdown` fires.
pub async fn run_sweeper(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = limiter.prune();
                metrics::record_tracked_clients(limiter.tracked());
                if removed > 0 {
                    tracing::debug!(removed, tracked = limiter.tracked(), "Pruned rate limit windows");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

fn apply_headers(headers: &mut HeaderMap, decision: &Decision) {
    let reset_at = SystemTime::now()
        .checked_add(decision.reset_after)
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or_default();

    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at));
}

/// Middleware applying the limiter ahead of every route.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = limiter.identity(request.headers(), peer);

    let decision = limiter.admit(&key);
    if decision.allowed {
        let mut response = next.run(request).await;
        apply_headers(response.headers_mut(), &decision);
        response
    } else {
        tracing::warn!(client = %key, limit = decision.limit, "Rate limit exceeded");
        metrics::record_rate_limited();
        let mut response = Response::new(Body::from("Limit exceeded"));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        apply_headers(response.headers_mut(), &decision);
        response
    }
}
