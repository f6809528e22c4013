//! Integration tests for seeding and the consistency checker.

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use veritas_core::document_type::DocumentType;
use veritas_db::keys::{ALL_KEYS, DOCUMENT_VERSIONS_KEY, METADATA_KEY, SECTION_VERSIONS_KEY};
use veritas_db::kv::{KvStore, MemoryStore, StoreError};
use veritas_db::models::document_version::CreateDocumentVersion;
use veritas_db::models::metadata::VersionMetadata;
use veritas_db::repositories::{DocumentVersionRepo, MetadataRepo};
use veritas_db::seed::{seed, SeedOutcome};
use veritas_db::verify::verify;

// ---------------------------------------------------------------------------
// Test: seeding an empty store writes all three records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_seed_empty_store() {
    let store = MemoryStore::new();
    let outcome = seed(&store).await.unwrap();
    assert_eq!(
        outcome,
        SeedOutcome::Seeded {
            documents: 3,
            sections: 3
        }
    );

    for key in ALL_KEYS {
        assert!(store.get(key).await.unwrap().is_some(), "{key} not written");
    }

    let meta = MetadataRepo::get(&store).await.unwrap();
    assert_eq!(meta.latest_for(DocumentType::Whitepaper), Some("1.1.0"));
    assert_eq!(meta.latest_for(DocumentType::Litepaper), Some("1.0.0"));
    assert_eq!(meta.current_version, "1.1.0");
}

// ---------------------------------------------------------------------------
// Test: a freshly seeded store verifies clean
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_seeded_store_is_consistent() {
    let store = MemoryStore::new();
    seed(&store).await.unwrap();

    let report = verify(&store).await.unwrap();
    assert!(report.is_consistent(), "issues: {:?}", report.issues);
    assert_eq!(report.documents, 3);
    assert_eq!(report.sections, 3);
}

// ---------------------------------------------------------------------------
// Test: seeding skips when any key already holds data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_seed_skips_populated_store() {
    let store = MemoryStore::new();
    store.set(SECTION_VERSIONS_KEY, "[]").await.unwrap();

    let outcome = seed(&store).await.unwrap();
    assert_matches!(outcome, SeedOutcome::Skipped { populated } if populated == [SECTION_VERSIONS_KEY]);
    assert!(store.get(DOCUMENT_VERSIONS_KEY).await.unwrap().is_none());
    assert!(store.get(METADATA_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_seed_twice_is_noop() {
    let store = MemoryStore::new();
    seed(&store).await.unwrap();
    let docs_before = store.get(DOCUMENT_VERSIONS_KEY).await.unwrap().unwrap();

    assert_matches!(seed(&store).await.unwrap(), SeedOutcome::Skipped { .. });
    let docs_after = store.get(DOCUMENT_VERSIONS_KEY).await.unwrap().unwrap();
    assert_eq!(docs_before, docs_after);
}

// ---------------------------------------------------------------------------
// Test: repository writes on top of seed data stay consistent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_writes_after_seed_stay_consistent() {
    let store = MemoryStore::new();
    seed(&store).await.unwrap();

    let created = DocumentVersionRepo::create(
        &store,
        &CreateDocumentVersion {
            version: "2.0.0".into(),
            document_type: DocumentType::Whitepaper,
            title: "Whitepaper v2".into(),
            description: String::new(),
            changelog: String::new(),
            release_date: Utc::now(),
            is_latest: true,
            sections: Vec::new(),
        },
    )
    .await
    .unwrap();

    let report = verify(&store).await.unwrap();
    assert!(report.is_consistent(), "issues: {:?}", report.issues);

    // Deleting keeps the version in metadata history; verify flags the orphan.
    DocumentVersionRepo::delete(&store, created.id).await.unwrap();
    let report = verify(&store).await.unwrap();
    assert_eq!(
        report.issues,
        ["Metadata version 2.0.0 has no matching document version"]
    );
}

// ---------------------------------------------------------------------------
// Test: verify reports corruption without repairing it
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_verify_reports_two_latest() {
    let store = MemoryStore::new();
    seed(&store).await.unwrap();

    // Flag every whitepaper as latest behind the repository's back.
    let raw = store.get(DOCUMENT_VERSIONS_KEY).await.unwrap().unwrap().value;
    let mut docs: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for doc in docs.as_array_mut().unwrap() {
        if doc["documentType"] == "whitepaper" {
            doc["isLatest"] = json!(true);
        }
    }
    let corrupted = docs.to_string();
    store.set(DOCUMENT_VERSIONS_KEY, &corrupted).await.unwrap();

    let report = verify(&store).await.unwrap();
    assert!(!report.is_consistent());
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("whitepaper has 2 versions flagged as latest")));

    let after = store.get(DOCUMENT_VERSIONS_KEY).await.unwrap().unwrap().value;
    assert_eq!(after, corrupted, "verify must not repair");
}

#[tokio::test]
async fn test_verify_reports_stale_metadata() {
    let store = MemoryStore::new();
    seed(&store).await.unwrap();

    let mut meta = MetadataRepo::get(&store).await.unwrap();
    meta.set_latest(DocumentType::Litepaper, Some("9.9.9"));
    meta.release_date.remove("1.0.0");
    MetadataRepo::update(&store, &meta).await.unwrap();

    let report = verify(&store).await.unwrap();
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("Latest litepaper version 9.9.9")));
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("Metadata version 1.0.0 has no release date")));
}

#[tokio::test]
async fn test_verify_reports_bad_section_type_and_missing_metadata() {
    let store = MemoryStore::new();
    let sections = json!([
        { "sectionId": "intro", "documentTypes": ["whitepaper", "brochure"] },
        { "sectionId": "orphan" }
    ]);
    store
        .set(SECTION_VERSIONS_KEY, &sections.to_string())
        .await
        .unwrap();

    let report = verify(&store).await.unwrap();
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("Section intro has invalid document type")));
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("Section orphan has no documentTypes list")));
    assert!(report
        .issues
        .iter()
        .any(|i| i == "Version metadata record is missing"));
    assert_eq!(report.sections, 2);
}

// ---------------------------------------------------------------------------
// Test: seed and verify surface outages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_seed_and_verify_when_unavailable() {
    let store = MemoryStore::new();
    store.set_available(false);

    assert_matches!(seed(&store).await, Err(StoreError::Unavailable(_)));
    assert_matches!(verify(&store).await, Err(StoreError::Unavailable(_)));
}

// ---------------------------------------------------------------------------
// Test: metadata defaults when nothing has been written
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_metadata_get_initialises_default() {
    let store = MemoryStore::new();
    let meta = MetadataRepo::get(&store).await.unwrap();

    assert_eq!(meta.current_version, "1.0.0");
    for t in DocumentType::ALL {
        assert_eq!(meta.latest_for(t), Some("1.0.0"));
    }
    assert!(store.get(METADATA_KEY).await.unwrap().is_some());

    // A second read returns the stored record, not a fresh default.
    let again: VersionMetadata = MetadataRepo::get(&store).await.unwrap();
    assert_eq!(again, meta);
}
