//! API Handlers
//!
//! HTTP request handlers and the state they share.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::ExpiringCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::limiter::SlidingWindowLimiter;
use crate::models::{HealthResponse, MessageResponse, StatsResponse};

/// Header telling the client whether a body came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Cache key for the stats snapshot.
const STATS_CACHE_KEY: &str = "stats:snapshot";
/// How long a stats snapshot is served from the cache.
const STATS_CACHE_TTL: Duration = Duration::from_secs(5);

/// Application state shared across all handlers and middleware.
///
/// Both components are built once at startup and shared by `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ExpiringCache>,
    pub limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    pub fn new(cache: Arc<ExpiringCache>, limiter: Arc<SlidingWindowLimiter>) -> Self {
        Self { cache, limiter }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds an empty cache and a limiter with the configured overrides.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ExpiringCache::new()),
            Arc::new(config.build_limiter()),
        )
    }
}

/// Handler for GET /api/v1/stats
///
/// Returns cache and limiter statistics. The snapshot itself is cached for a
/// few seconds and the `X-Cache` header reports `HIT` or `MISS`.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Response> {
    if let Some(cached) = state.cache.get(STATS_CACHE_KEY) {
        return Ok(([(CACHE_STATUS_HEADER, "HIT")], Json(cached)).into_response());
    }

    let snapshot = StatsResponse::new(state.cache.stats(), state.limiter.stats());
    let body: Value =
        serde_json::to_value(&snapshot).map_err(|e| ApiError::Internal(e.to_string()))?;
    state
        .cache
        .set(STATS_CACHE_KEY, body.clone(), STATS_CACHE_TTL);

    Ok(([(CACHE_STATUS_HEADER, "MISS")], Json(body)).into_response())
}

/// Handler for POST /api/v1/cache/clear
///
/// Flushes every cached entry.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.flush();
    info!("Cache cleared on request");

    Json(MessageResponse::new("Cache cleared successfully"))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
