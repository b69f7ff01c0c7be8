//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory SQLite database, so tests need no
//! external services and can run in parallel.

// Helpers are shared across test binaries; not every binary uses all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use phrasebook_api::{app::create_app, config::Config};
use persistence::db::{create_pool, run_migrations, DatabaseConfig};
use sqlx::SqlitePool;

/// Create a migrated in-memory database pool.
pub async fn create_test_pool() -> SqlitePool {
    let pool = create_pool(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Test configuration built from embedded defaults.
pub fn test_config() -> Config {
    Config::load_for_test(&[("database.url", "sqlite::memory:")])
        .expect("Failed to build test config")
}

/// Test configuration with a custom batch limit.
pub fn test_config_with_batch_limit(max_batch_size: usize) -> Config {
    let limit = max_batch_size.to_string();
    Config::load_for_test(&[
        ("database.url", "sqlite::memory:"),
        ("limits.max_batch_size", limit.as_str()),
    ])
    .expect("Failed to build test config")
}

/// Create the test application.
pub fn create_test_app(config: Config, pool: SqlitePool) -> Router {
    create_app(config, pool)
}

/// Fresh database plus app with default configuration.
pub async fn setup() -> (Router, SqlitePool) {
    let pool = create_test_pool().await;
    let app = create_test_app(test_config(), pool.clone());
    (app, pool)
}

/// Test phrase data.
pub struct TestPhrase {
    pub title: String,
    pub content: String,
}

impl TestPhrase {
    pub fn new() -> Self {
        Self {
            title: Sentence(1..4).fake(),
            content: Paragraph(1..3).fake(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "title": self.title, "content": self.content })
    }
}

impl Default for TestPhrase {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a request with a raw, possibly malformed, JSON body.
pub fn raw_json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless request.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    empty_request(Method::GET, uri)
}

/// Build a DELETE request.
pub fn delete_request(uri: &str) -> Request<Body> {
    empty_request(Method::DELETE, uri)
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Read the response body as text.
pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).into_owned()
}

/// Insert a phrase through the API and return the listed record.
pub async fn create_phrase_via_api(app: &Router, phrase: &TestPhrase) -> serde_json::Value {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/phrases", phrase.to_json()))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let listed = list_phrases(app).await;
    listed
        .as_array()
        .and_then(|items| items.iter().find(|p| p["title"] == phrase.title.as_str()))
        .cloned()
        .expect("Created phrase not listed")
}

/// Fetch `GET /api/phrases` as JSON.
pub async fn list_phrases(app: &Router) -> serde_json::Value {
    use tower::ServiceExt;

    let response = app.clone().oneshot(get_request("/api/phrases")).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    parse_response_body(response).await
}
