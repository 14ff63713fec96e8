//! Per-client request limiting over fixed one-hour windows

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::server::api::{ApiError, AppState};

/// Windows kept in memory before expired ones are swept
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started: DateTime<Utc>,
    count: u32,
}

/// Counts requests per client key
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Arc<RwLock<HashMap<String, ClientWindow>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window`
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a limiter allowing `limit` requests per hour
    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::hours(1))
    }

    /// Requests allowed per window
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Record a request from `client`; `false` when it is over the limit
    pub async fn check(&self, client: &str) -> bool {
        self.check_at(client, Utc::now()).await
    }

    /// Same as [`RateLimiter::check`] with an explicit clock
    pub async fn check_at(&self, client: &str, now: DateTime<Utc>) -> bool {
        let mut clients = self.clients.write().await;

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now - w.started < window);
            debug!("Swept rate limit windows, {} active", clients.len());
        }

        let entry = clients.entry(client.to_string()).or_insert(ClientWindow {
            started: now,
            count: 0,
        });

        if now - entry.started >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.limit {
            return false;
        }

        entry.count += 1;
        true
    }
}

/// Peer address of the request. With `trust_proxy`, the first
/// `X-Forwarded-For` hop is used when present.
pub fn client_key(req: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting clients over the configured hourly limit
pub async fn enforce(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let Some(limiter) = &state.limiter else {
        return next.run(req).await;
    };

    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let client = client_key(&req, state.settings.trust_proxy);
    if !limiter.check(&client).await {
        warn!("Rate limit exceeded for {}", client);
        return ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            format!("Too many requests: limit of {} per hour exceeded", limiter.limit()),
        )
        .into_response();
    }

    next.run(req).await
}
