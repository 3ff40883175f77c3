#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use cinedex_api::config::ServerConfig;
use cinedex_api::router::build_app_router;
use cinedex_api::state::AppState;
use cinedex_core::selector::FieldSelector;
use cinedex_core::target::Target;
use cinedex_store::{CachedMasterData, MemoryStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over `store`, with the same
/// middleware stack production uses.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let state = AppState {
        master_data: Arc::new(CachedMasterData::new(Arc::clone(&store))),
        store,
        config: Arc::new(config.clone()),
        shutdown: CancellationToken::new(),
    };
    build_app_router(state, &config)
}

/// A memory store seeded with three movies:
///
/// - `m1`: studio Acme, tags "Drama, Romance"
/// - `m2`: no studio, tags "Drama"
/// - `m3`: studio Globex, no tags
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_target(
            Target::new("m1")
                .with_field(FieldSelector::Studio, "Acme")
                .with_field(FieldSelector::Tag, "Drama, Romance"),
        )
        .await;
    store
        .insert_target(Target::new("m2").with_field(FieldSelector::Tag, "Drama"))
        .await;
    store
        .insert_target(Target::new("m3").with_field(FieldSelector::Studio, "Globex"))
        .await;
    store
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
