// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the Hanibi backend.
//!
//! Only the access token in `MockState::valid_access` is accepted; a
//! successful refresh rotates both tokens, like the real backend.

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hanibi_client::config::Config;
use hanibi_client::services::AuthStore;
use hanibi_client::AppState;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Knobs and counters shared with the mock handlers.
#[derive(Default)]
pub struct MockState {
    pub valid_access: Mutex<String>,
    pub valid_refresh: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub event_calls: AtomicUsize,
    pub snapshot_calls: AtomicUsize,
    /// Delay before answering a refresh, to widen race windows
    pub refresh_delay_ms: AtomicU64,
    /// Reject every refresh
    pub refresh_fails: AtomicBool,
    /// Issue new tokens on refresh but keep rejecting them
    pub refresh_grants_nothing: AtomicBool,
    /// Answer refresh inside the `{ success, data }` envelope
    pub refresh_enveloped: AtomicBool,
    pub events: Mutex<Value>,
    pub snapshots: Mutex<Value>,
    pub last_events_query: Mutex<Option<String>>,
    pub last_snapshots_query: Mutex<Option<String>>,
    pub seen_auth_headers: Mutex<Vec<Option<String>>>,
}

#[allow(dead_code)]
impl MockState {
    pub fn accept_access(&self, token: &str) {
        *self.valid_access.lock().unwrap() = token.to_string();
    }

    pub fn accept_refresh(&self, token: &str) {
        *self.valid_refresh.lock().unwrap() = token.to_string();
    }

    pub fn set_events(&self, events: Value) {
        *self.events.lock().unwrap() = events;
    }

    pub fn set_snapshots(&self, snapshots: Value) {
        *self.snapshots.lock().unwrap() = snapshots;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }
}

/// A running mock backend. The server task is aborted on drop.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[allow(dead_code)]
impl MockBackend {
    /// Start a backend that accepts `access-0`/`refresh-0` and serves no data.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        state.accept_access("access-0");
        state.accept_refresh("refresh-0");
        state.set_events(json!([]));
        state.set_snapshots(json!([]));

        let app = Router::new()
            .route("/api/v1/devices/{device_id}/events", get(list_events))
            .route("/api/v1/cameras/{device_id}/snapshots", get(list_snapshots))
            .route("/api/v1/auth/refresh", post(refresh))
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/broken", get(broken_envelope))
            .route("/api/v1/fail", get(server_error))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn config(&self) -> Config {
        Config::with_base_url(self.base_url.clone())
    }

    /// App state whose store starts with the given tokens (or logged out).
    pub fn app(&self, tokens: Option<(&str, &str)>) -> AppState {
        let store = match tokens {
            Some((access, refresh)) => AuthStore::with_tokens(access, refresh),
            None => AuthStore::new(),
        };
        AppState::with_store(self.config(), Arc::new(store)).expect("Failed to build app state")
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn check_auth(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let token = bearer(headers);
    state.seen_auth_headers.lock().unwrap().push(token.clone());

    let valid = state.valid_access.lock().unwrap().clone();
    if token.as_deref() == Some(valid.as_str()) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "token expired" })),
        )
            .into_response())
    }
}

async fn list_events(
    State(state): State<Arc<MockState>>,
    Path(_device_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.event_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_events_query.lock().unwrap() = query;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    let data = state.events.lock().unwrap().clone();
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn list_snapshots(
    State(state): State<Arc<MockState>>,
    Path(_device_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.snapshot_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_snapshots_query.lock().unwrap() = query;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    let data = state.snapshots.lock().unwrap().clone();
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let n = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let presented = body["refreshToken"].as_str().unwrap_or_default().to_string();
    let expected = state.valid_refresh.lock().unwrap().clone();
    if state.refresh_fails.load(Ordering::SeqCst) || presented != expected {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "invalid refresh token" })),
        )
            .into_response();
    }

    let access = format!("access-{}", n);
    let refresh = format!("refresh-{}", n);
    if !state.refresh_grants_nothing.load(Ordering::SeqCst) {
        state.accept_access(&access);
    }
    state.accept_refresh(&refresh);

    let pair = json!({ "accessToken": access, "refreshToken": refresh });
    if state.refresh_enveloped.load(Ordering::SeqCst) {
        Json(json!({ "success": true, "data": pair })).into_response()
    } else {
        Json(pair).into_response()
    }
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["email"] != "owner@example.com" || body["password"] != "hunter2" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "bad credentials" })),
        )
            .into_response();
    }

    state.accept_access("access-login");
    state.accept_refresh("refresh-login");
    Json(json!({
        "success": true,
        "data": { "accessToken": "access-login", "refreshToken": "refresh-login" }
    }))
    .into_response()
}

async fn broken_envelope(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }
    Json(json!({ "success": false, "message": "device offline" })).into_response()
}

async fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}
