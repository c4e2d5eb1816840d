//! Rate-limit middleware
//!
//! Applies the client and resource limits to every request before it
//! reaches a handler.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::handlers::AppState;
use crate::error::{ApiError, Result};
use crate::limiter::Axis;

/// Admits a request only if both the client and the path are under their
/// limits.
///
/// Both checks always run so each table records the attempt. A client
/// denial is reported ahead of a path denial.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_ip(req.headers(), peer);
    let path = req.uri().path();

    let client_allowed = state.limiter.is_client_allowed(&client);
    let path_allowed = state.limiter.is_resource_allowed(path);

    if !client_allowed {
        debug!(client = %client, path, "Rejecting request: client over limit");
        return Err(ApiError::rate_limited(Axis::Client));
    }
    if !path_allowed {
        debug!(client = %client, path, "Rejecting request: path over limit");
        return Err(ApiError::rate_limited(Axis::Resource));
    }

    Ok(next.run(req).await)
}

/// Picks the client address for a request.
///
/// Uses the first `X-Forwarded-For` entry, then `X-Real-IP`, then the peer
/// address of the connection.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = header_value(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').map(str::trim).find(|ip| !ip.is_empty()))
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_value(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
