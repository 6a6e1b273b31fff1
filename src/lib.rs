// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! PTA Portal: member accounts and admin tooling for a parent-teacher organization.
//!
//! This crate provides the request-scoped session/role gate shared by every
//! route group, and the credential cipher that protects third-party OAuth
//! tokens at rest.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::{CredentialStore, ProfileStore};
use services::{CredentialVault, SessionKeys};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session_keys: Arc<SessionKeys>,
    pub profiles: ProfileStore,
    pub vault: CredentialVault,
}

impl AppState {
    /// Build state from configuration and already-constructed stores.
    pub fn new(config: Config, profiles: ProfileStore, credentials: CredentialStore) -> Self {
        let session_keys = Arc::new(SessionKeys::new(&config.session_signing_key));
        let vault = CredentialVault::new(credentials, config.token_encryption_key.clone());
        Self {
            config,
            session_keys,
            profiles,
            vault,
        }
    }
}
