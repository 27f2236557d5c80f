//! Common utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use genai_core::{mock::MockBackend, GenAiConfig, Studio};
use server::{build_app, config::ServerConfig, with_rate_limit, AppState};
use tower::ServiceExt;

/// App wired to a scripted backend. Returns the state too so tests can
/// inspect the audio store and metrics.
pub fn create_test_app(mock: MockBackend) -> (Router, AppState, Arc<MockBackend>) {
    let mock = Arc::new(mock);
    let genai = GenAiConfig::default().with_api_key("test-key-for-integration-tests");
    let studio = Studio::new(&genai, mock.clone());
    let state = AppState::new(studio, ServerConfig::default());
    (build_app(state.clone()), state, mock)
}

/// Test app behind the global rate limiter.
pub fn create_rate_limited_app(mock: MockBackend, rate_limit_per_minute: u32) -> Router {
    let mock = Arc::new(mock);
    let genai = GenAiConfig::default().with_api_key("test-key-for-integration-tests");
    let config = ServerConfig {
        rate_limit_per_minute,
        ..ServerConfig::default()
    };
    let state = AppState::new(Studio::new(&genai, mock), config.clone());
    with_rate_limit(build_app(state), &config).unwrap()
}

/// App with no credential configured.
pub fn create_unconfigured_app(mock: MockBackend) -> (Router, Arc<MockBackend>) {
    let mock = Arc::new(mock);
    let studio = Studio::new(&GenAiConfig::default(), mock.clone());
    let state = AppState::new(studio, ServerConfig::default());
    (build_app(state), mock)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(
        app,
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}
