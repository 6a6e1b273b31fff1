// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member profile model and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Authorization role. Closed set; unknown values fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Member,
    Volunteer,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Roles allowed into the admin area.
    pub const ADMINS: [Role; 2] = [Role::Admin, Role::SuperAdmin];
    /// Roles allowed into the volunteer area.
    pub const VOLUNTEERS: [Role; 3] = [Role::Volunteer, Role::Admin, Role::SuperAdmin];
    /// Every role.
    pub const ALL: [Role; 4] = [Role::Member, Role::Volunteer, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Volunteer => "volunteer",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// Profile row in the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Matches the session subject id
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub campus: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// New profile with the default `member` role.
    pub fn new_member(id: impl Into<String>, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            display_name: None,
            role: Role::Member,
            campus: None,
            email,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a column-scoped write. Columns absent from the patch are kept.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(name) = &patch.display_name {
            self.display_name = Some(name.clone());
        }
        if let Some(campus) = &patch.campus {
            self.campus = campus.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        self.updated_at = patch.updated_at;
    }
}

/// Account-settings form. The role is deliberately absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 100))]
    pub campus: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Columns this form changes. Blank campus or phone clears the column.
    pub fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            display_name: self.display_name.map(|name| name.trim().to_string()),
            campus: self.campus.map(non_blank),
            phone: self.phone.map(non_blank),
            ..ProfilePatch::new()
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

/// Partial write to a `profiles` row. Only the columns that are `Some` are
/// sent, so a settings write and a role write never overwrite each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// `Some(None)` clears the column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub updated_at: DateTime<Utc>,
}

impl ProfilePatch {
    fn new() -> Self {
        Self {
            display_name: None,
            campus: None,
            phone: None,
            role: None,
            updated_at: Utc::now(),
        }
    }

    /// Patch touching only the role column.
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::new()
        }
    }
}
