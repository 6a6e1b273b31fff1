// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Third-party integration credentials (encrypted at rest).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row in the `integration_credentials` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Integration name (also the primary key)
    pub provider: String,
    /// Encrypted access token (`iv:tag:ciphertext` hex)
    pub access_token_encrypted: String,
    /// Encrypted refresh token, if the provider issued one
    #[serde(default)]
    pub refresh_token_encrypted: Option<String>,
    /// When the access token expires
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted OAuth scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Subject id of the admin who connected the integration
    pub connected_by: String,
    pub connected_at: DateTime<Utc>,
}
