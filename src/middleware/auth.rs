// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session/role middleware.
//!
//! [`attach_request_context`] runs on every request and stores a fresh
//! [`PortalContext`] in the request extensions. Route groups are then gated
//! with the `require_*` middleware, and handlers read the caller through
//! [`CurrentUser`] or the context itself.

use crate::db::ProfileStore;
use crate::models::{Identity, Role};
use crate::services::resolver::{RequestContext, RoleSet};
use crate::services::session::{session_token, CookieSession};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Request context as wired into the HTTP stack.
pub type PortalContext = RequestContext<CookieSession, ProfileStore>;

/// Build the per-request resolver. Nothing is looked up until a guard asks.
pub async fn attach_request_context(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(&jar, request.headers());
    let context = PortalContext::new(
        CookieSession::new(token, state.session_keys.clone()),
        state.profiles.clone(),
        state.config.redirects.clone(),
    );
    request.extensions_mut().insert(Arc::new(context));

    next.run(request).await
}

/// Any signed-in user with a provisioned profile.
pub async fn require_member(request: Request, next: Next) -> Response {
    gate(&Role::ALL, request, next).await
}

/// Volunteers and above.
pub async fn require_volunteer(request: Request, next: Next) -> Response {
    gate(&Role::VOLUNTEERS, request, next).await
}

/// Admins and super admins.
pub async fn require_admin(request: Request, next: Next) -> Response {
    gate(&Role::ADMINS, request, next).await
}

async fn gate<R: RoleSet + ?Sized>(accepted: &R, request: Request, next: Next) -> Response {
    let Some(context) = request.extensions().get::<Arc<PortalContext>>().cloned() else {
        tracing::error!("Role gate reached without a request context");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    if let Err(denied) = context.require_role(accepted).await {
        tracing::debug!(
            path = %request.uri().path(),
            reason = ?denied.reason,
            "Request denied by role gate"
        );
        return denied.into_response();
    }

    next.run(request).await
}

/// Extractor for handlers that need a signed-in caller.
///
/// Redirects to the login destination when there is no valid session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<Arc<PortalContext>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("CurrentUser extracted without a request context");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })?;

        context
            .require_authenticated()
            .await
            .map(|identity| CurrentUser(identity.clone()))
            .map_err(IntoResponse::into_response)
    }
}
