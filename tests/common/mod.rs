// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use garmin_gateway::config::Config;
use garmin_gateway::db::MemoryStore;
use garmin_gateway::routes::create_router;
use garmin_gateway::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by an in-memory store.
/// Returns the router and a handle on the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, MemoryStore) {
    create_test_app_with_config(Config::test_default())
}

/// Same as [`create_test_app`] with a custom configuration.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(config, Arc::new(store.clone())));
    (create_router(state), store)
}

/// Send a request and return the status and parsed JSON body.
#[allow(dead_code)]
pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// POST a JSON body.
#[allow(dead_code)]
pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// GET a URI.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
