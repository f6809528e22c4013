#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use veritas_api::config::ServerConfig;
use veritas_api::router::build_app_router;
use veritas_api::state::AppState;
use veritas_db::kv::MemoryStore;

/// Key configured on every test app.
pub const TEST_API_KEY: &str = "test-api-key";

/// Build a test `ServerConfig` with safe defaults and [`TEST_API_KEY`].
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        api_key: Some(TEST_API_KEY.to_string()),
    }
}

/// Build the full application router over `store` with `config`.
pub fn build_app_with(store: Arc<MemoryStore>, config: ServerConfig) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build the full application router over `store`.
///
/// Tests keep their own handle on the store to seed data or simulate an
/// outage with [`MemoryStore::set_available`].
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_with(store, test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    api_key: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// POST with the test key.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(TEST_API_KEY), Some(body)).await
}

/// POST with an explicit key (or none).
pub async fn post_json_key(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    api_key: Option<&str>,
) -> Response<Body> {
    send(app, Method::POST, uri, api_key, Some(body)).await
}

/// PUT with the test key.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(TEST_API_KEY), Some(body)).await
}

/// DELETE with the test key.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(TEST_API_KEY), None).await
}

/// DELETE with an explicit key (or none).
pub async fn delete_key(app: Router, uri: &str, api_key: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, api_key, None).await
}

/// Any method, no body, with the test key.
pub async fn request(app: Router, method: Method, uri: &str) -> Response<Body> {
    send(app, method, uri, Some(TEST_API_KEY), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
