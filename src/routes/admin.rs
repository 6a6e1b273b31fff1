// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes (admin, super_admin).

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, PortalContext};
use crate::models::{ProfilePatch, Role};
use crate::services::vault::{is_valid_provider, ConnectRequest, IntegrationStatus};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Admin routes. The admin gate is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/admin/integrations/{provider}",
            get(get_integration)
                .put(connect_integration)
                .delete(disconnect_integration),
        )
        .route(
            "/admin/integrations/{provider}/verify",
            post(verify_integration),
        )
        .route("/admin/members/{id}/role", put(set_member_role))
}

fn checked_provider(provider: &str) -> Result<()> {
    if is_valid_provider(provider) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid provider name: {}",
            provider
        )))
    }
}

// ─── Integrations ────────────────────────────────────────────

async fn get_integration(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Json<IntegrationStatus>> {
    checked_provider(&provider)?;
    Ok(Json(state.vault.status(&provider).await?))
}

/// Store OAuth tokens for an integration (encrypted at rest).
async fn connect_integration(
    State(state): State<Arc<AppState>>,
    CurrentUser(identity): CurrentUser,
    Path(provider): Path<String>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<IntegrationStatus>> {
    checked_provider(&provider)?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let status = state
        .vault
        .connect(&provider, request, &identity.subject_id)
        .await?;
    Ok(Json(status))
}

async fn disconnect_integration(
    State(state): State<Arc<AppState>>,
    CurrentUser(identity): CurrentUser,
    Path(provider): Path<String>,
) -> Result<StatusCode> {
    checked_provider(&provider)?;

    tracing::info!(
        provider = %provider,
        subject = %identity.subject_id,
        "Admin disconnecting integration"
    );

    if state.vault.disconnect(&provider).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Integration {} is not connected",
            provider
        )))
    }
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub provider: String,
    pub readable: bool,
}

/// Confirm the stored access token still decrypts under the current key.
async fn verify_integration(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Json<VerifyResponse>> {
    checked_provider(&provider)?;

    let token = state
        .vault
        .access_token(&provider)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Integration {} is not connected", provider)))?;

    Ok(Json(VerifyResponse {
        provider,
        readable: !token.is_empty(),
    }))
}

// ─── Member Roles ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// Change a member's role. Granting `admin` or `super_admin`, or changing
/// an existing admin, requires `super_admin`; otherwise the caller gets the
/// same deny redirect as the route gates.
async fn set_member_role(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<Arc<PortalContext>>,
    Path(id): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Response> {
    let current = state
        .profiles
        .get_profile(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

    if Role::ADMINS.contains(&request.role) || Role::ADMINS.contains(&current.role) {
        if let Err(denied) = context.require_role(&Role::SuperAdmin).await {
            return Ok(denied.into_response());
        }
    }

    let profile = state
        .profiles
        .update_profile(&id, &ProfilePatch::role(request.role))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

    tracing::info!(
        member = %id,
        from = %current.role,
        to = %request.role,
        "Member role changed"
    );

    Ok(Json(profile).into_response())
}
