// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod identity;
pub mod profile;

pub use credential::StoredCredential;
pub use identity::{Identity, SessionUser};
pub use profile::{Profile, ProfilePatch, ProfileUpdate, Role};
