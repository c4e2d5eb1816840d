//! Error types for the HTTP surface
//!
//! The cache and limiter have no error channel of their own; this is what
//! the request layer turns their decisions into.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::limiter::Axis;

/// Seconds a rate-limited caller is told to wait before retrying.
pub const RETRY_AFTER_SECS: u64 = 60;

// == Api Error Enum ==
/// Unified error type for HTTP handlers and middleware.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client or the requested resource is over its rate limit
    #[error("{}", rate_limit_message(.axis))]
    RateLimited { axis: Axis, retry_after_secs: u64 },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Rate-limit denial on `axis` with the standard retry hint.
    pub fn rate_limited(axis: Axis) -> Self {
        ApiError::RateLimited {
            axis,
            retry_after_secs: RETRY_AFTER_SECS,
        }
    }
}

fn rate_limit_message(axis: &Axis) -> &'static str {
    match axis {
        Axis::Client => "Too many requests. Please try again later.",
        Axis::Resource => "This endpoint is currently rate limited. Please try again later.",
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        let mut response = (status, body).into_response();
        if let ApiError::RateLimited { retry_after_secs, .. } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
