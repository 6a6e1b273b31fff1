// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The authenticated caller for one request.

use super::profile::{Profile, Role};

/// Subject reported by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub subject_id: String,
    pub email: String,
}

/// Session subject plus its profile, if one has been provisioned.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
    pub profile: Option<Profile>,
}

impl Identity {
    pub fn new(user: SessionUser, profile: Option<Profile>) -> Self {
        Self {
            subject_id: user.subject_id,
            email: user.email,
            profile,
        }
    }

    /// Role from the profile; `None` when the profile is not provisioned.
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }
}
