//! Integration tests for API key enforcement, method routing and store outages.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{body_json, delete_key, get, post_json, post_json_key, request};
use serde_json::json;
use veritas_db::kv::MemoryStore;

fn section_body() -> serde_json::Value {
    json!({
        "sectionId": "introduction",
        "title": "Introduction",
        "path": "/docs/introduction",
        "version": "1.0.0",
        "lastUpdated": "2024-01-15T00:00:00Z",
        "documentTypes": ["whitepaper", "litepaper"],
        "tags": ["overview"],
    })
}

// ---------------------------------------------------------------------------
// Test: writes without a valid key are 401 and write nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_without_key_is_unauthorized() {
    let store = Arc::new(MemoryStore::new());

    for key in [None, Some(""), Some("wrong-key"), Some("test-api-key-but-longer")] {
        let app = common::build_test_app(Arc::clone(&store));
        let response = post_json_key(app, "/api/versions/section", section_body(), key).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "key {key:?}");
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }

    let app = common::build_test_app(Arc::clone(&store));
    let listed = body_json(get(app, "/api/versions/section").await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn auth_is_checked_before_body_validation() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));
    let response = post_json_key(app, "/api/versions/document", json!({}), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn delete_without_key_is_unauthorized() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));
    let uri = format!("/api/versions/document/{}", uuid::Uuid::new_v4());
    let response = delete_key(app, &uri, Some("nope")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: an unconfigured server key rejects every write
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unconfigured_key_rejects_writes() {
    let mut config = common::test_config();
    config.api_key = None;
    let app = common::build_app_with(Arc::new(MemoryStore::new()), config);

    let response = post_json(app, "/api/versions/section", section_body()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: reads are public
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reads_need_no_key() {
    let store = Arc::new(MemoryStore::new());
    for uri in ["/api/versions", "/api/versions/document", "/api/versions/section"] {
        let app = common::build_test_app(Arc::clone(&store));
        assert_eq!(get(app, uri).await.status(), StatusCode::OK, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: unsupported methods are 405
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_methods_return_405() {
    let store = Arc::new(MemoryStore::new());
    let id_uri = format!("/api/versions/section/{}", uuid::Uuid::new_v4());
    let cases = [
        (Method::POST, "/api/versions"),
        (Method::DELETE, "/api/versions/document"),
        (Method::PATCH, "/api/versions/section"),
        (Method::POST, id_uri.as_str()),
    ];

    for (method, uri) in cases {
        let app = common::build_test_app(Arc::clone(&store));
        let response = request(app, method.clone(), uri).await;
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} {uri}"
        );
    }
}

// ---------------------------------------------------------------------------
// Test: a store outage is 503, never an empty list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_outage_returns_503() {
    let store = Arc::new(MemoryStore::new());
    store.set_available(false);

    for uri in ["/api/versions", "/api/versions/document", "/api/versions/section"] {
        let app = common::build_test_app(Arc::clone(&store));
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body_json(response).await["code"], "STORE_UNAVAILABLE");
    }

    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/section", section_body()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Recovery is immediate once the store answers again.
    store.set_available(true);
    let app = common::build_test_app(Arc::clone(&store));
    assert_eq!(get(app, "/api/versions/section").await.status(), StatusCode::OK);
}
