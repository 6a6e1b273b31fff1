// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Volunteer area (volunteer, admin, super_admin).

use crate::middleware::{CurrentUser, PortalContext};
use crate::models::Role;
use crate::AppState;
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/volunteer/overview", get(overview))
}

#[derive(Serialize)]
pub struct VolunteerOverview {
    pub subject_id: String,
    pub display_name: Option<String>,
    pub campus: Option<String>,
    pub role: Option<Role>,
    /// Whether the caller may also manage shifts
    pub can_manage_shifts: bool,
}

async fn overview(
    Extension(context): Extension<Arc<PortalContext>>,
    CurrentUser(identity): CurrentUser,
) -> Json<VolunteerOverview> {
    let can_manage_shifts = context.has_role(&Role::ADMINS).await;
    let profile = identity.profile.as_ref();

    Json(VolunteerOverview {
        subject_id: identity.subject_id.clone(),
        display_name: profile.and_then(|p| p.display_name.clone()),
        campus: profile.and_then(|p| p.campus.clone()),
        role: identity.role(),
        can_manage_shifts,
    })
}
