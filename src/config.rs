//! Configuration Module
//!
//! Handles loading server, cache and rate-limit settings from environment
//! variables and turning them into a ready limiter.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::limiter::SlidingWindowLimiter;

/// Endpoints that get the stricter authentication limits.
pub const AUTH_PATHS: [&str; 5] = [
    "/api/v1/login",
    "/api/v1/register",
    "/api/v1/refresh-token",
    "/api/v1/verify-email",
    "/api/v1/change-password",
];

/// Administrative endpoints with their own limits.
pub const ADMIN_PATHS: [&str; 5] = [
    "/api/v1/users",
    "/api/v1/add-user",
    "/api/v1/update-user-role",
    "/api/v1/update-user-status",
    "/api/v1/delete-user",
];

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default requests allowed per window, per client and per path
    pub default_max_requests: usize,
    /// Default window
    pub default_window: Duration,
    /// Requests allowed per window on authentication endpoints
    pub auth_max_requests: usize,
    /// Window for authentication endpoints
    pub auth_window: Duration,
    /// Requests allowed per window on admin endpoints
    pub admin_max_requests: usize,
    /// Window for admin endpoints
    pub admin_window: Duration,
    /// Rate-limit sweep interval
    pub rate_limit_cleanup_interval: Duration,
    /// Cache sweep interval
    pub cache_cleanup_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `RATE_LIMIT_DEFAULT_MAX` - default requests per window (default: 100)
    /// - `RATE_LIMIT_DEFAULT_WINDOW` - default window (default: 1m)
    /// - `RATE_LIMIT_AUTH_MAX` - auth endpoint requests per window (default: 5)
    /// - `RATE_LIMIT_AUTH_WINDOW` - auth endpoint window (default: 1m)
    /// - `RATE_LIMIT_ADMIN_MAX` - admin endpoint requests per window (default: 20)
    /// - `RATE_LIMIT_ADMIN_WINDOW` - admin endpoint window (default: 1m)
    /// - `RATE_LIMIT_CLEANUP_INTERVAL` - limiter sweep frequency (default: 5m)
    /// - `CACHE_CLEANUP_INTERVAL` - cache sweep frequency (default: 5m)
    ///
    /// Windows and intervals take a unit-suffixed duration (`30s`, `500ms`,
    /// `1m`) or bare whole seconds. Unset or unparsable values fall back to
    /// their defaults. Zero is not accepted for windows or intervals.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_max_requests: env_or("RATE_LIMIT_DEFAULT_MAX", defaults.default_max_requests),
            default_window: env_duration_or("RATE_LIMIT_DEFAULT_WINDOW", defaults.default_window),
            auth_max_requests: env_or("RATE_LIMIT_AUTH_MAX", defaults.auth_max_requests),
            auth_window: env_duration_or("RATE_LIMIT_AUTH_WINDOW", defaults.auth_window),
            admin_max_requests: env_or("RATE_LIMIT_ADMIN_MAX", defaults.admin_max_requests),
            admin_window: env_duration_or("RATE_LIMIT_ADMIN_WINDOW", defaults.admin_window),
            rate_limit_cleanup_interval: env_duration_or(
                "RATE_LIMIT_CLEANUP_INTERVAL",
                defaults.rate_limit_cleanup_interval,
            ),
            cache_cleanup_interval: env_duration_or(
                "CACHE_CLEANUP_INTERVAL",
                defaults.cache_cleanup_interval,
            ),
        }
    }

    /// Builds the limiter with the default policy and the auth and admin
    /// endpoint overrides registered.
    pub fn build_limiter(&self) -> SlidingWindowLimiter {
        let limiter = SlidingWindowLimiter::new(
            self.default_max_requests,
            self.default_window,
        );

        for path in AUTH_PATHS {
            limiter.set_path_config(path, self.auth_max_requests, self.auth_window);
        }

        for path in ADMIN_PATHS {
            limiter.set_path_config(path, self.admin_max_requests, self.admin_window);
        }

        info!(
            "Rate limiting configured: default {}/{:?}, auth {}/{:?}, admin {}/{:?}",
            self.default_max_requests,
            self.default_window,
            self.auth_max_requests,
            self.auth_window,
            self.admin_max_requests,
            self.admin_window
        );

        limiter
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_max_requests: 100,
            default_window: Duration::from_secs(60),
            auth_max_requests: 5,
            auth_window: Duration::from_secs(60),
            admin_max_requests: 20,
            admin_window: Duration::from_secs(60),
            rate_limit_cleanup_interval: Duration::from_secs(300),
            cache_cleanup_interval: Duration::from_secs(300),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_duration_or(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| parse_duration(v.trim()))
        .filter(|d| !d.is_zero())
        .unwrap_or(default)
}

/// Parses `"45"` as seconds, anything else as a humantime duration.
fn parse_duration(raw: &str) -> Option<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => humantime::parse_duration(raw).ok(),
    }
}
