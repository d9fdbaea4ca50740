//! Router fixtures for handler tests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use gl_core::ledger::{AccountDirectory, InMemoryLedgerStore};
use gl_core::policy::{PostingPolicy, standard_chart};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

/// The full router over an in-memory store seeded with the standard chart.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryLedgerStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryLedgerStore::new());
        let directory = AccountDirectory::new(store.clone());
        for account in standard_chart() {
            directory.create_account(account).await.unwrap();
        }
        let state = AppState::new(
            store.clone(),
            store.clone(),
            Arc::new(PostingPolicy::standard()),
        );
        Self {
            router: create_router(state),
            store,
        }
    }

    /// Sends one request; an empty body comes back as `Value::Null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
