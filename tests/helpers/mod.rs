//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use storefront_api::{AppState, build_app};
use storefront_core::config::{AppConfig, DatabaseConfig};
use storefront_database::{DatabasePool, run_migrations};

/// Test application context over a private, seeded in-memory database.
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Database pool for direct checks
    pub db: DatabasePool,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_environment("test").await
    }

    /// Create a test application reporting the given environment.
    pub async fn with_environment(environment: &str) -> Self {
        let config = AppConfig {
            environment: environment.to_string(),
            database: DatabaseConfig::in_memory(),
            ..AppConfig::default()
        };

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to open in-memory database");
        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let router = build_app(AppState::new(config, db.clone()));

        Self { router, db }
    }

    /// Make a JSON request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.request_raw(method, path, &body_str).await
    }

    /// Make a request with a literal body
    pub async fn request_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }

    /// Number of items in a list endpoint's `data` array.
    pub async fn count(&self, path: &str) -> usize {
        let response = self.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]
            .as_array()
            .expect("data should be an array")
            .len()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Raw body text
    pub text: String,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
}

impl TestResponse {
    /// Assert this is a problem-details response with the given status.
    pub fn assert_problem(&self, status: StatusCode) {
        assert_eq!(self.status, status, "{}", self.text);
        assert_eq!(
            self.content_type.as_deref(),
            Some("application/problem+json")
        );
        assert_eq!(self.body["status"], status.as_u16());
    }
}
