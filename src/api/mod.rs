//! API Module
//!
//! HTTP handlers, rate-limit middleware and routing.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /api/v1/stats` - Cache and rate limiter statistics
//! - `POST /api/v1/cache/clear` - Flush the cache

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{client_ip, rate_limit};
pub use routes::create_router;
