//! Integration tests for the master-data endpoints and their cache.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use cinedex_core::selector::FieldSelector;
use cinedex_core::store::MasterDataItem;
use cinedex_store::MemoryStore;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;

fn item(id: &str, name: &str) -> MasterDataItem {
    MasterDataItem {
        id: id.into(),
        name: name.into(),
    }
}

#[tokio::test]
async fn list_is_served_from_cache() {
    let store = Arc::new(MemoryStore::new());
    store.insert_value(FieldSelector::Studio, item("s1", "Acme")).await;
    let app = build_test_app(Arc::clone(&store));

    let first = get(app.clone(), "/api/v1/master-data/studio").await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["data"], json!([{ "id": "s1", "name": "Acme" }]));

    get(app, "/api/v1/master-data/studio").await;
    assert_eq!(store.list_count().await, 1);
}

#[tokio::test]
async fn create_value_refreshes_cached_list() {
    let store = Arc::new(MemoryStore::new());
    let app = build_test_app(Arc::clone(&store));
    get(app.clone(), "/api/v1/master-data/tag").await;

    let created = post_json(
        app.clone(),
        "/api/v1/master-data/tag",
        json!({ "name": " Noir " }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["data"]["name"], "Noir");

    let listed = body_json(get(app, "/api/v1/master-data/tag").await).await;
    assert_eq!(listed["data"][0]["name"], "Noir");
}

#[tokio::test]
async fn blank_name_rejected() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(app, "/api/v1/master-data/tag", json!({ "name": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalidate_forces_reload() {
    let store = Arc::new(MemoryStore::new());
    let app = build_test_app(Arc::clone(&store));
    get(app.clone(), "/api/v1/master-data/label").await;
    store.insert_value(FieldSelector::Label, item("l1", "Premium")).await;

    let response = post_json(
        app.clone(),
        "/api/v1/master-data/invalidate",
        json!({ "selector": "label" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed = body_json(get(app, "/api/v1/master-data/label").await).await;
    assert_eq!(listed["data"][0]["name"], "Premium");
    assert_eq!(store.list_count().await, 2);
}

#[tokio::test]
async fn invalidate_without_selector_drops_everything() {
    let store = Arc::new(MemoryStore::new());
    let app = build_test_app(Arc::clone(&store));
    get(app.clone(), "/api/v1/master-data/series").await;
    get(app.clone(), "/api/v1/master-data/type").await;

    let response = post_json(app.clone(), "/api/v1/master-data/invalidate", json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    get(app.clone(), "/api/v1/master-data/series").await;
    get(app, "/api/v1/master-data/type").await;
    assert_eq!(store.list_count().await, 4);
}

#[tokio::test]
async fn unknown_selector_rejected() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = get(app, "/api/v1/master-data/genre").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("studio"));
}
