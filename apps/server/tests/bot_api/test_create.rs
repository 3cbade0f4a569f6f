//! E2E tests: bot creation.

use std::sync::Arc;

use botnest_lib::db::BotStore;
use serde_json::json;

use super::test_helpers::*;

fn looks_like_identifier(hash: &str) -> bool {
    let mut parts = hash.split('_');
    parts.next() == Some("bot")
        && parts
            .by_ref()
            .take(2)
            .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            .count()
            == 2
        && parts.next().is_none()
}

/// (A) Valid description → 200 with hash and key.
#[actix_rt::test]
async fn test_create_returns_hash_and_key() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, body) = post_json(&app, "/api/v1/bot", json!({ "description": "Hello world" })).await;

    assert_eq!(status, 200, "Create should succeed: {}", body);
    let hash = body["hash"].as_str().unwrap();
    let api_key = body["apiKey"].as_str().unwrap();
    assert!(looks_like_identifier(hash), "Unexpected hash shape: {}", hash);
    assert!(api_key.contains('_'));
    assert_eq!(store.insert_count(), 1);

    let stored = store.inner.list_all().await.unwrap();
    assert_eq!(stored[0].hash, hash);
    assert_eq!(stored[0].api_key, api_key);
    assert!(stored[0].script().unwrap().contains(api_key));
}

/// (B) Harmful description → 500 and nothing stored.
#[actix_rt::test]
async fn test_harmful_description_rejected() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, body) = post_json(
        &app,
        "/api/v1/bot",
        json!({ "description": "eval( something )" }),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Harmful content detected" }));
    assert_eq!(store.insert_count(), 0, "Rejected bots must not be inserted");
}

/// Screening is case-sensitive.
#[actix_rt::test]
async fn test_screening_is_case_sensitive() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, _) = post_json(&app, "/api/v1/bot", json!({ "description": "MALICIOUS" })).await;
    assert_eq!(status, 200);

    let (status, _) = post_json(&app, "/api/v1/bot", json!({ "description": "malicious" })).await;
    assert_eq!(status, 500);

    assert_eq!(store.insert_count(), 1);
}

/// Description may come from the query string on POST.
#[actix_rt::test]
async fn test_create_from_query_string() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, body) = post_raw(&app, "/api/v1/bot?description=Quiet%20robot", "").await;

    assert_eq!(status, 200, "Create should succeed: {}", body);
    let stored = store.inner.list_all().await.unwrap();
    assert_eq!(stored[0].description, "Quiet robot");
}

/// Store insert failure → 500 with the store's message and hint.
#[actix_rt::test]
async fn test_store_failure_surfaces_message() {
    let app = create_test_app(local_service(Arc::new(DownStore))).await;

    let (status, body) = post_json(&app, "/api/v1/bot", json!({ "description": "fine" })).await;

    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({
            "error": "Invalid API key",
            "hint": "Double check your Supabase `anon` or `service_role` API key."
        })
    );
}

/// A numeric description is taken as text.
#[actix_rt::test]
async fn test_numeric_description_creates() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, body) = post_json(&app, "/api/v1/bot", json!({ "description": 123 })).await;

    assert_eq!(status, 200, "Create should succeed: {}", body);
    let stored = store.inner.list_all().await.unwrap();
    assert_eq!(stored[0].description, "123");
}

/// Two creations never share a hash or key.
#[actix_rt::test]
async fn test_creations_are_distinct() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (hash_a, key_a) = create_bot(&app, "first").await;
    let (hash_b, key_b) = create_bot(&app, "second").await;

    assert_ne!(key_a, key_b);
    assert!(looks_like_identifier(&hash_a) && looks_like_identifier(&hash_b));
    assert_eq!(store.insert_count(), 2);
}

/// The legacy function path behaves like the versioned one.
#[actix_rt::test]
async fn test_legacy_path_creates() {
    let store = Arc::new(CountingStore::default());
    let app = create_test_app(local_service(store.clone())).await;

    let (status, body) = post_json(
        &app,
        "/.netlify/functions/bot",
        json!({ "description": "legacy" }),
    )
    .await;

    assert_eq!(status, 200, "Legacy create should succeed: {}", body);
    assert_eq!(store.insert_count(), 1);
}
