//! In-process HTTP harness over the memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use burnlink_api::{AppState, build_router};
use burnlink_core::config::AppConfig;
use burnlink_database::MemoryLinkStore;
use burnlink_service::NoopSink;

/// Base64 of `%PDF-1.7`.
pub const PDF_BASE64: &str = "JVBERi0xLjc=";

/// Decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.server.base_url = "https://burn.example.com".to_string();

        let state = AppState::new(
            Arc::new(config),
            Arc::new(MemoryLinkStore::new()),
            Arc::new(NoopSink),
        );
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Create a link and return its id.
    pub async fn create(&self, policy: Value) -> String {
        let response = self
            .request(Method::POST, "/api/links", Some(create_body(policy)))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }
}

pub fn create_body(policy: Value) -> Value {
    json!({
        "file_name": "offer-letter.pdf",
        "media_type": "application/pdf",
        "document": PDF_BASE64,
        "watermarks": [{"x_percent": 12.5, "y_percent": 80.0}],
        "policy": policy,
        "notify_target": "hr@example.com"
    })
}
