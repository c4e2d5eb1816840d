//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles through the router and rate limiter.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_shield::{api::create_router, AppState, ExpiringCache, SlidingWindowLimiter};
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_state(max_requests: usize) -> AppState {
    AppState::new(
        Arc::new(ExpiringCache::new()),
        Arc::new(SlidingWindowLimiter::new(max_requests, Duration::from_secs(60))),
    )
}

fn get_from(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn status_of(app: &Router, req: Request<Body>) -> StatusCode {
    app.clone().oneshot(req).await.unwrap().status()
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_state(100));

    let response = app.oneshot(get_from("/health", "192.0.2.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint_reports_cache_header() {
    let app = create_router(create_state(100));

    let first = app
        .clone()
        .oneshot(get_from("/api/v1/stats", "192.0.2.1"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-cache"], "MISS");
    let json = body_to_json(first.into_body()).await;
    assert!(json["cache"]["hits"].is_u64());
    // The request that produced this snapshot was already admitted
    assert_eq!(json["rate_limiter"]["client_admitted"], 1);

    let second = app
        .oneshot(get_from("/api/v1/stats", "192.0.2.1"))
        .await
        .unwrap();
    assert_eq!(second.headers()["x-cache"], "HIT");
}

// == Cache Clear Endpoint Tests ==

#[tokio::test]
async fn test_cache_clear_flushes() {
    let state = create_state(100);
    state
        .cache
        .set("all_users", "[]", Duration::from_secs(300));
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("cleared"));
    assert!(state.cache.get("all_users").is_none());
}

#[tokio::test]
async fn test_cache_clear_rejects_get() {
    let app = create_router(create_state(100));

    let status = status_of(&app, get_from("/api/v1/cache/clear", "192.0.2.1")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// == Rate Limit Tests ==

#[tokio::test]
async fn test_client_limit_returns_429_with_retry_after() {
    let app = create_router(create_state(3));

    for _ in 0..3 {
        assert_eq!(status_of(&app, get_from("/health", "203.0.113.5")).await, StatusCode::OK);
    }

    let response = app
        .oneshot(get_from("/health", "203.0.113.5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "60");
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Too many requests"));
}

#[tokio::test]
async fn test_client_and_path_axes_combine() {
    let app = create_router(create_state(1));

    assert_eq!(status_of(&app, get_from("/health", "198.51.100.1")).await, StatusCode::OK);
    assert_eq!(
        status_of(&app, get_from("/health", "198.51.100.1")).await,
        StatusCode::TOO_MANY_REQUESTS
    );
    // Same path, new client: the client axis admits, but the path is spent
    assert_eq!(
        status_of(&app, get_from("/health", "198.51.100.2")).await,
        StatusCode::TOO_MANY_REQUESTS
    );
    // New client on a fresh path is admitted
    assert_eq!(
        status_of(&app, get_from("/api/v1/stats", "198.51.100.3")).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_path_override_denies_with_endpoint_message() {
    let state = create_state(100);
    state
        .limiter
        .set_path_config("/api/v1/stats", 2, Duration::from_secs(60));
    let app = create_router(state);

    // Different clients so only the path axis can trip
    assert_eq!(status_of(&app, get_from("/api/v1/stats", "10.0.0.1")).await, StatusCode::OK);
    assert_eq!(status_of(&app, get_from("/api/v1/stats", "10.0.0.2")).await, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_from("/api/v1/stats", "10.0.0.3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("endpoint"));

    // Other paths keep the default
    assert_eq!(status_of(&app, get_from("/health", "10.0.0.3")).await, StatusCode::OK);
}

#[tokio::test]
async fn test_peer_address_used_without_proxy_headers() {
    let app = create_router(create_state(1));
    let peer: SocketAddr = "192.0.2.44:40000".parse().unwrap();

    let request = || {
        let mut req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        req
    };

    assert_eq!(status_of(&app, request()).await, StatusCode::OK);
    assert_eq!(status_of(&app, request()).await, StatusCode::TOO_MANY_REQUESTS);
}
