//! Integration tests for the template endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use cinedex_core::template::TemplateGroup;
use cinedex_store::MemoryStore;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;

fn group(id: &str, types: &[&str], is_default: bool) -> TemplateGroup {
    TemplateGroup {
        id: id.into(),
        name: id.into(),
        template_url: format!("https://img.example/{id}/*pl.jpg"),
        gallery_template: Some(format!("https://img.example/{id}/*jp-##.jpg")),
        applicable_types: types.iter().map(|s| s.to_string()).collect(),
        applicable_studios: Vec::new(),
        is_default,
    }
}

async fn store_with_groups() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert_template_group(group("default", &[], true)).await;
    store.insert_template_group(group("amateur", &["amateur"], false)).await;
    store
}

#[tokio::test]
async fn expand_pads_image_index() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app,
        "/api/v1/templates/expand",
        json!({ "template": "https://x/*/*-###.jpg", "code": "abc123", "image_index": 7 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["url"], "https://x/abc123/abc123-007.jpg");
}

#[tokio::test]
async fn expand_requires_code() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app,
        "/api/v1/templates/expand",
        json!({ "template": "https://x/*.jpg", "code": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validate_reports_violations() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app,
        "/api/v1/templates/validate",
        json!({ "template_url": "https://x/cover.jpg", "gallery_template": "https://x/g.jpg" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    let violations = json["data"]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["kind"], "missing_code_placeholder");
    assert!(violations[0]["message"].is_string());
}

#[tokio::test]
async fn validate_accepts_good_pair() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app,
        "/api/v1/templates/validate",
        json!({ "template_url": "https://x/*.jpg", "gallery_template": "https://x/*-#.jpg" }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["violations"], json!([]));
}

#[tokio::test]
async fn groups_listed_from_registry() {
    let app = build_test_app(store_with_groups().await);

    let json = body_json(get(app, "/api/v1/templates/groups").await).await;

    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn resolve_prefers_matching_group() {
    let app = build_test_app(store_with_groups().await);

    let response = post_json(
        app,
        "/api/v1/templates/resolve",
        json!({ "code": "abc123", "movie_type": "amateur", "gallery_count": 2 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["group_id"], "amateur");
    assert_eq!(json["data"]["cover_url"], "https://img.example/amateur/abc123pl.jpg");
    assert_eq!(
        json["data"]["gallery_urls"],
        json!([
            "https://img.example/amateur/abc123jp-01.jpg",
            "https://img.example/amateur/abc123jp-02.jpg"
        ])
    );
}

#[tokio::test]
async fn resolve_falls_back_to_default() {
    let app = build_test_app(store_with_groups().await);

    let response = post_json(
        app,
        "/api/v1/templates/resolve",
        json!({ "code": "abc123", "movie_type": "feature" }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["group_id"], "default");
    assert_eq!(json["data"]["gallery_urls"], json!([]));
}

#[tokio::test]
async fn resolve_without_any_group_returns_404() {
    let app = build_test_app(Arc::new(MemoryStore::new()));

    let response = post_json(
        app,
        "/api/v1/templates/resolve",
        json!({ "code": "abc123" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
