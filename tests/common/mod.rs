#![allow(dead_code)]

use std::sync::Arc;

use aion_api::config::AppConfig;
use aion_api::testing::{production_config, test_config, test_state, RecordingMailer};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use httpmock::MockServer;
use serde_json::Value;
use tower::ServiceExt;

/// Router wired to a mock backend and a recording mailer.
pub struct TestApp {
    pub backend: MockServer,
    pub mailer: Arc<RecordingMailer>,
    router: Router,
}

impl TestApp {
    /// Development deployment: requests run with the service role, no token needed.
    pub async fn start() -> Self {
        Self::with(test_config, RecordingMailer::new()).await
    }

    /// Production deployment: requests must carry a user token.
    pub async fn production() -> Self {
        Self::with(production_config, RecordingMailer::new()).await
    }

    pub async fn with_failing_mailer() -> Self {
        Self::with(test_config, RecordingMailer::failing()).await
    }

    async fn with(config: fn(&str) -> AppConfig, mailer: RecordingMailer) -> Self {
        let backend = MockServer::start_async().await;
        let mailer = Arc::new(mailer);
        let state = test_state(config(&backend.base_url()), mailer.clone());
        Self {
            backend,
            mailer,
            router: aion_api::app(state),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

/// `message` field of a response body.
pub fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or_default()
}
