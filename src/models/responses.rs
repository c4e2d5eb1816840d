//! Response DTOs
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::limiter::LimiterStats;

/// Response body for the stats endpoint (GET /api/v1/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStatsBody,
    pub rate_limiter: LimiterStats,
    /// When this snapshot was taken, RFC 3339
    pub generated_at: String,
}

/// Cache statistics plus the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsBody {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse stamped with the current time
    pub fn new(cache: CacheStats, rate_limiter: LimiterStats) -> Self {
        let hit_rate = cache.hit_rate();
        Self {
            cache: CacheStatsBody {
                stats: cache,
                hit_rate,
            },
            rate_limiter,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Generic confirmation body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
