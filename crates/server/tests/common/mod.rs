//! Common test utilities for in-process API testing with mock sources.
//!
//! Builds the real router over an orchestrator whose sources are
//! [`MockSource`] instances, so tests control every upstream without
//! network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use armory_core::testing::MockSource;
use armory_core::{Config, FetchOrchestrator, SourceAdapter};
use armory_server::api::create_router;
use armory_server::state::AppState;

/// Re-export fixtures for test convenience
pub use armory_core::testing::fixtures;

/// Test fixture exposing the router plus handles to its mock sources.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Handles to the mock sources behind the orchestrator
    pub sources: Vec<Arc<MockSource>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture over the given mock sources with a default config.
    pub fn with_sources(sources: Vec<Arc<MockSource>>) -> Self {
        Self::with_config_and_sources(Config::default(), sources)
    }

    /// Create a fixture with a custom config (e.g. to test sanitization).
    pub fn with_config_and_sources(config: Config, sources: Vec<Arc<MockSource>>) -> Self {
        let orchestrator = Arc::new(FetchOrchestrator::new(
            sources
                .iter()
                .map(|s| Arc::clone(s) as Arc<dyn SourceAdapter>)
                .collect(),
        ));

        let state = Arc::new(AppState::new(config, orchestrator));
        let router = create_router(state);

        Self { router, sources }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request (refresh takes no body).
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// GET a plain-text endpoint (e.g. /metrics).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }
}
