#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

use gymdesk::{
    session::{AuthProvider, SessionGate},
    AppStateBuilder, RouterOptions,
};

use super::mocks::{ProviderBehaviour, ScriptedAuthProvider};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Non-JSON bodies (plain text, redirects) come back as a JSON string or null
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None, None)).await
    }

    pub async fn get_with_cookies(&self, uri: &str, cookies: &str) -> TestResponse {
        self.send(request(Method::GET, uri, None, Some(cookies))).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, Some(body), None)).await
    }

    pub async fn post_with_cookies(&self, uri: &str, cookies: &str) -> TestResponse {
        self.send(request(Method::POST, uri, None, Some(cookies))).await
    }
}

pub fn request(
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookies: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestSetupBuilder {
    builder: AppStateBuilder,
    auth_timeout: Duration,
}

impl TestSetupBuilder {
    pub fn with_provider(provider: Arc<dyn AuthProvider + Send + Sync>) -> Self {
        Self {
            builder: AppStateBuilder::new(provider),
            auth_timeout: Duration::from_millis(200),
        }
    }

    pub fn with_behaviour(behaviour: ProviderBehaviour) -> (Self, Arc<ScriptedAuthProvider>) {
        let provider = Arc::new(ScriptedAuthProvider::new(behaviour));
        (Self::with_provider(provider.clone()), provider)
    }

    pub fn state(mut self, configure: impl FnOnce(AppStateBuilder) -> AppStateBuilder) -> Self {
        self.builder = configure(self.builder);
        self
    }

    pub fn build(self) -> TestApp {
        let gate = SessionGate {
            auth_timeout: self.auth_timeout,
            ..SessionGate::default()
        };
        let state = self.builder.with_session_gate(gate).build();

        TestApp {
            router: gymdesk::app(state, RouterOptions::default()),
        }
    }
}
