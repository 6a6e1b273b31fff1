// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes.
//!
//! Sign-in itself is completed by the auth provider, which sets the session
//! cookie; the portal only needs to end sessions.

use crate::services::session::SESSION_COOKIE;
use crate::AppState;
use axum::{extract::State, response::Redirect, routing::post, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/logout", post(logout))
}

/// Clear the session cookie and send the caller to the login page.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    let had_session = jar.get(SESSION_COOKIE).is_some();
    tracing::info!(had_session, "Logging out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(&state.config.redirects.login_path))
}
