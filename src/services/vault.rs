// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential vault for third-party integrations.
//!
//! Admins connect the storefront and payment integrations by handing over
//! OAuth tokens. Tokens are encrypted with [`cipher`] before they reach the
//! credential store and are only decrypted when a server-side caller needs
//! them.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::models::StoredCredential;
use crate::services::cipher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tokens obtained from a provider's OAuth flow.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConnectRequest {
    #[validate(length(min = 1, max = 4096))]
    pub access_token: String,
    #[validate(length(min = 1, max = 4096))]
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Connection metadata. Never includes token material.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntegrationStatus {
    pub provider: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub has_refresh_token: bool,
    pub scopes: Vec<String>,
}

impl IntegrationStatus {
    fn disconnected(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            connected: false,
            connected_by: None,
            connected_at: None,
            expires_at: None,
            has_refresh_token: false,
            scopes: Vec::new(),
        }
    }
}

impl From<&StoredCredential> for IntegrationStatus {
    fn from(credential: &StoredCredential) -> Self {
        Self {
            provider: credential.provider.clone(),
            connected: true,
            connected_by: Some(credential.connected_by.clone()),
            connected_at: Some(credential.connected_at),
            expires_at: credential.expires_at,
            has_refresh_token: credential.refresh_token_encrypted.is_some(),
            scopes: credential.scopes.clone(),
        }
    }
}

/// Returns true for provider names usable as storage keys.
pub fn is_valid_provider(provider: &str) -> bool {
    !provider.is_empty()
        && provider.len() <= 64
        && provider
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Encrypting front end to the credential store.
#[derive(Clone)]
pub struct CredentialVault {
    store: CredentialStore,
    /// Hex key from configuration; validated on every use.
    key: Option<String>,
}

impl CredentialVault {
    pub fn new(store: CredentialStore, key: Option<String>) -> Self {
        Self { store, key }
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Encrypt and store tokens for `provider`, replacing any previous ones.
    pub async fn connect(
        &self,
        provider: &str,
        request: ConnectRequest,
        connected_by: &str,
    ) -> Result<IntegrationStatus, AppError> {
        let access_token_encrypted = cipher::encrypt(&request.access_token, self.key())?;
        let refresh_token_encrypted = request
            .refresh_token
            .as_deref()
            .map(|token| cipher::encrypt(token, self.key()))
            .transpose()?;

        let credential = StoredCredential {
            provider: provider.to_string(),
            access_token_encrypted,
            refresh_token_encrypted,
            expires_at: request.expires_at,
            scopes: request.scopes,
            connected_by: connected_by.to_string(),
            connected_at: Utc::now(),
        };

        self.store.put(&credential).await?;

        tracing::info!(
            provider,
            connected_by,
            has_refresh_token = credential.refresh_token_encrypted.is_some(),
            "Integration credentials stored"
        );

        Ok(IntegrationStatus::from(&credential))
    }

    pub async fn status(&self, provider: &str) -> Result<IntegrationStatus, AppError> {
        Ok(self
            .store
            .get(provider)
            .await?
            .as_ref()
            .map(IntegrationStatus::from)
            .unwrap_or_else(|| IntegrationStatus::disconnected(provider)))
    }

    /// Decrypted access token, or `None` when the provider is not connected.
    pub async fn access_token(&self, provider: &str) -> Result<Option<String>, AppError> {
        let Some(credential) = self.store.get(provider).await? else {
            return Ok(None);
        };

        let token = cipher::decrypt(&credential.access_token_encrypted, self.key()).map_err(|e| {
            tracing::error!(provider, "Stored access token could not be decrypted");
            e
        })?;

        Ok(Some(token))
    }

    /// Decrypted refresh token, if one was stored.
    pub async fn refresh_token(&self, provider: &str) -> Result<Option<String>, AppError> {
        let Some(encrypted) = self
            .store
            .get(provider)
            .await?
            .and_then(|c| c.refresh_token_encrypted)
        else {
            return Ok(None);
        };

        Ok(Some(cipher::decrypt(&encrypted, self.key())?))
    }

    /// Destroy stored credentials. Returns whether any existed.
    pub async fn disconnect(&self, provider: &str) -> Result<bool, AppError> {
        let removed = self.store.delete(provider).await?;
        tracing::info!(provider, removed, "Integration disconnected");
        Ok(removed)
    }
}
