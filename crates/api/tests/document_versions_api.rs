//! HTTP-level integration tests for `/api/versions` and `/api/versions/document`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::{json, Value};
use veritas_db::kv::MemoryStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn doc_body(doc_type: &str, version: &str, is_latest: bool) -> Value {
    json!({
        "version": version,
        "documentType": doc_type,
        "title": format!("{doc_type} {version}"),
        "description": "Test document",
        "isLatest": is_latest,
        "changelog": "",
        "sections": ["introduction"],
    })
}

async fn create_doc(store: &Arc<MemoryStore>, doc_type: &str, version: &str, latest: bool) -> Value {
    let app = common::build_test_app(Arc::clone(store));
    let body = doc_body(doc_type, version, latest);
    let response = post_json(app, "/api/versions/document", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn metadata(store: &Arc<MemoryStore>) -> Value {
    let app = common::build_test_app(Arc::clone(store));
    let response = get(app, "/api/versions").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: GET /api/versions initialises the default metadata
// ---------------------------------------------------------------------------

#[tokio::test]
async fn metadata_defaults_on_empty_store() {
    let store = Arc::new(MemoryStore::new());
    let json = metadata(&store).await;

    assert_eq!(json["currentVersion"], "1.0.0");
    assert_eq!(json["versions"], json!(["1.0.0"]));
    assert_eq!(json["latestVersions"]["executiveSummary"], "1.0.0");
    assert!(json["releaseDate"]["1.0.0"].is_string());
}

// ---------------------------------------------------------------------------
// Test: create stamps releaseDate and returns 201
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_document_version_returns_201() {
    let store = Arc::new(MemoryStore::new());
    let mut body = doc_body("whitepaper", "1.0.0", true);
    body["releaseDate"] = json!("1999-01-01T00:00:00Z");

    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/document", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["id"].is_string());
    assert_eq!(json["documentType"], "whitepaper");
    assert_eq!(json["isLatest"], true);
    assert!(
        !json["releaseDate"].as_str().unwrap().starts_with("1999"),
        "releaseDate must be stamped by the server"
    );
}

// ---------------------------------------------------------------------------
// Test: the latest lifecycle through HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_version_follows_creates_and_deletes() {
    let store = Arc::new(MemoryStore::new());

    let a = create_doc(&store, "whitepaper", "1.0.0", true).await;
    assert_eq!(metadata(&store).await["latestVersions"]["whitepaper"], "1.0.0");

    let b = create_doc(&store, "whitepaper", "2.0.0", true).await;
    assert_eq!(metadata(&store).await["latestVersions"]["whitepaper"], "2.0.0");

    let a_uri = format!("/api/versions/document/{}", a["id"].as_str().unwrap());
    let b_uri = format!("/api/versions/document/{}", b["id"].as_str().unwrap());

    let app = common::build_test_app(Arc::clone(&store));
    let a_now = body_json(get(app, &a_uri).await).await;
    assert_eq!(a_now["isLatest"], false);

    let app = common::build_test_app(Arc::clone(&store));
    let response = delete(app, &b_uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(metadata(&store).await["latestVersions"]["whitepaper"], "1.0.0");

    let app = common::build_test_app(Arc::clone(&store));
    let response = delete(app, &a_uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(metadata(&store).await["latestVersions"]["whitepaper"], "0.0.0");
}

// ---------------------------------------------------------------------------
// Test: list filters by ?type= and rejects unknown types
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_type() {
    let store = Arc::new(MemoryStore::new());
    create_doc(&store, "whitepaper", "1.0.0", true).await;
    create_doc(&store, "litepaper", "1.0.0", true).await;

    let app = common::build_test_app(Arc::clone(&store));
    let all = body_json(get(app, "/api/versions/document").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let app = common::build_test_app(Arc::clone(&store));
    let lite = body_json(get(app, "/api/versions/document?type=litepaper").await).await;
    let lite = lite.as_array().unwrap();
    assert_eq!(lite.len(), 1);
    assert_eq!(lite[0]["documentType"], "litepaper");

    let app = common::build_test_app(Arc::clone(&store));
    let response = get(app, "/api/versions/document?type=brochure").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("executiveSummary"));
}

// ---------------------------------------------------------------------------
// Test: create validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejects_missing_and_malformed_fields() {
    let store = Arc::new(MemoryStore::new());

    let mut body = doc_body("whitepaper", "1.0.0", true);
    body.as_object_mut().unwrap().remove("isLatest");
    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/document", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["missing"], json!(["isLatest"]));

    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/document", doc_body("whitepaper", "v1", true)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = doc_body("whitepaper", "1.0.0", true);
    body["title"] = json!("");
    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/document", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(Arc::clone(&store));
    let response = post_json(app, "/api/versions/document", doc_body("brochure", "1.0.0", true)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(Arc::clone(&store));
    let listed = body_json(get(app, "/api/versions/document").await).await;
    assert!(listed.as_array().unwrap().is_empty(), "nothing should be written");
}

// ---------------------------------------------------------------------------
// Test: partial update and promotion through PUT
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_promotes_and_patches() {
    let store = Arc::new(MemoryStore::new());
    let old = create_doc(&store, "litepaper", "1.0.0", true).await;
    create_doc(&store, "litepaper", "1.1.0", true).await;

    let uri = format!("/api/versions/document/{}", old["id"].as_str().unwrap());
    let app = common::build_test_app(Arc::clone(&store));
    let response = put_json(app, &uri, json!({ "isLatest": true, "changelog": "Reinstated" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["isLatest"], true);
    assert_eq!(json["changelog"], "Reinstated");
    assert_eq!(json["title"], old["title"]);
    assert_eq!(metadata(&store).await["latestVersions"]["litepaper"], "1.0.0");

    let app = common::build_test_app(Arc::clone(&store));
    let response = put_json(app, &uri, json!({ "version": "1.0" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: unknown ids are 404 for get, update and delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_id_returns_404() {
    let store = Arc::new(MemoryStore::new());
    let uri = format!("/api/versions/document/{}", uuid::Uuid::new_v4());

    let app = common::build_test_app(Arc::clone(&store));
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let app = common::build_test_app(Arc::clone(&store));
    let response = put_json(app, &uri, json!({ "title": "Ghost" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(Arc::clone(&store));
    let response = delete(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
