// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod route_tests;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use rti_tracker::{ComplaintStore, MemoryAttachments, MemoryCache, Moment};
use rti_tracker_domain::DomainError;
use rti_tracker_persistence::Persistence;
use std::sync::Arc;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::backends::{AttachmentBackend, CacheBackend, ServerStore};
use crate::routes::{AppState, build_router};

fn fixed_now() -> Result<Moment, DomainError> {
    Moment::from_datetime(datetime!(2026-03-01 10:00:00 UTC))
}

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let store: ServerStore = ComplaintStore::new(
        persistence,
        CacheBackend::Memory(MemoryCache::new()),
        AttachmentBackend::Memory(MemoryAttachments::new()),
    );
    AppState {
        store: Arc::new(Mutex::new(store)),
        clock: fixed_now,
    }
}

pub fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Sends one request and returns the status, headers and body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, axum::http::HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request: Request<Body> = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let headers: axum::http::HeaderMap = response.headers().clone();
    let bytes: Bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}

/// Sends one request and parses the JSON response body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    let json: serde_json::Value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn complaint_body(portal_name: &str, complaint_id: &str) -> serde_json::Value {
    serde_json::json!({
        "complaintId": complaint_id,
        "complaintName": "Water supply",
        "portalName": portal_name,
        "category": "Grievance",
        "dateLodged": "2026-01-15",
        "status": "Pending",
        "department": "Water Works"
    })
}
