// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes for signed-in members.

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, PortalContext};
use crate::models::{ProfileUpdate, Role};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account routes (gated on any provisioned role in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/account/me", get(get_me))
        .route("/account/profile", patch(update_profile))
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub subject_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub campus: Option<String>,
    pub phone: Option<String>,
    pub is_volunteer: bool,
    pub is_admin: bool,
}

/// Get the current user's identity and capabilities.
async fn get_me(
    Extension(context): Extension<Arc<PortalContext>>,
    CurrentUser(identity): CurrentUser,
) -> Json<MeResponse> {
    let is_volunteer = context.has_role(&Role::VOLUNTEERS).await;
    let is_admin = context.has_role(&Role::ADMINS).await;
    let profile = identity.profile.as_ref();

    Json(MeResponse {
        display_name: profile.and_then(|p| p.display_name.clone()),
        role: identity.role(),
        campus: profile.and_then(|p| p.campus.clone()),
        phone: profile.and_then(|p| p.phone.clone()),
        subject_id: identity.subject_id,
        email: identity.email,
        is_volunteer,
        is_admin,
    })
}

/// Update display name, campus and phone.
///
/// Writes only those columns, never the role.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(identity): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<MeResponse>> {
    update
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let profile = state
        .profiles
        .update_profile(&identity.subject_id, &update.into_patch())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", identity.subject_id)))?;

    tracing::info!(subject = %identity.subject_id, "Profile updated");

    Ok(Json(MeResponse {
        subject_id: identity.subject_id,
        email: identity.email,
        is_volunteer: Role::VOLUNTEERS.contains(&profile.role),
        is_admin: Role::ADMINS.contains(&profile.role),
        role: Some(profile.role),
        display_name: profile.display_name,
        campus: profile.campus,
        phone: profile.phone,
    }))
}
