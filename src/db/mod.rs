// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (hosted Postgres via its REST API, or in-memory).

pub mod credentials;
pub mod postgrest;
pub mod profiles;

pub use credentials::CredentialStore;
pub use postgrest::PostgrestClient;
pub use profiles::ProfileStore;

/// Table names as constants.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    /// Encrypted third-party OAuth credentials (keyed by provider)
    pub const INTEGRATION_CREDENTIALS: &str = "integration_credentials";
}
