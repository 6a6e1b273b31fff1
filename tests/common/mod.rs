// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use pta_portal::config::Config;
use pta_portal::db::{CredentialStore, ProfileStore};
use pta_portal::models::{Profile, Role};
use pta_portal::routes::create_router;
use pta_portal::AppState;
use std::sync::Arc;

/// Create a test app with in-memory stores.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        config,
        ProfileStore::new_mock(),
        CredentialStore::new_mock(),
    ));
    (create_router(state.clone()), state)
}

/// Insert a profile with the given role and return a session token for it.
#[allow(dead_code)]
pub async fn sign_in_as(state: &AppState, subject_id: &str, role: Role) -> String {
    let mut profile = Profile::new_member(subject_id, Some(format!("{subject_id}@example.org")));
    profile.role = role;
    state
        .profiles
        .upsert_profile(&profile)
        .await
        .expect("Failed to seed profile");
    session_for(state, subject_id)
}

/// Session token for a subject without touching the profile store.
#[allow(dead_code)]
pub fn session_for(state: &AppState, subject_id: &str) -> String {
    state
        .session_keys
        .issue(subject_id, &format!("{subject_id}@example.org"))
        .expect("Failed to issue session token")
}

/// Build a request carrying the session cookie.
#[allow(dead_code)]
pub fn request_with_session(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("pta_session={token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
