// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Encrypted integration credential storage.
//!
//! Only ciphertext ever reaches this layer; see `services::vault`.

use crate::db::{tables, PostgrestClient};
use crate::error::StoreError;
use crate::models::StoredCredential;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Rest(PostgrestClient),
    Memory(Arc<DashMap<String, StoredCredential>>),
}

/// Credentials keyed by provider name.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Backend,
}

impl CredentialStore {
    pub fn new(client: PostgrestClient) -> Self {
        Self {
            backend: Backend::Rest(client),
        }
    }

    /// In-memory store for local development and tests.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    pub async fn get(&self, provider: &str) -> Result<Option<StoredCredential>, StoreError> {
        match &self.backend {
            Backend::Rest(client) => {
                client
                    .select_one(tables::INTEGRATION_CREDENTIALS, "provider", provider)
                    .await
            }
            Backend::Memory(map) => Ok(map.get(provider).map(|c| c.clone())),
        }
    }

    pub async fn put(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Rest(client) => {
                client
                    .upsert(tables::INTEGRATION_CREDENTIALS, credential)
                    .await
            }
            Backend::Memory(map) => {
                map.insert(credential.provider.clone(), credential.clone());
                Ok(())
            }
        }
    }

    /// Remove a credential. Returns whether one existed.
    pub async fn delete(&self, provider: &str) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Rest(client) => {
                client
                    .delete(tables::INTEGRATION_CREDENTIALS, "provider", provider)
                    .await
            }
            Backend::Memory(map) => Ok(map.remove(provider).is_some()),
        }
    }
}
