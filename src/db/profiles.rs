// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile storage.

use crate::db::{tables, PostgrestClient};
use crate::error::StoreError;
use crate::models::{Profile, ProfilePatch};
use crate::services::resolver::ProfileSource;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Rest(PostgrestClient),
    Memory(Arc<DashMap<String, Profile>>),
}

/// Profiles keyed by session subject id.
#[derive(Clone)]
pub struct ProfileStore {
    backend: Backend,
}

impl ProfileStore {
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

    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        match &self.backend {
            Backend::Rest(client) => client.select_one(tables::PROFILES, "id", id).await,
            Backend::Memory(map) => Ok(map.get(id).map(|p| p.clone())),
        }
    }

    /// Create or replace a profile.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Rest(client) => client.upsert(tables::PROFILES, profile).await,
            Backend::Memory(map) => {
                map.insert(profile.id.clone(), profile.clone());
                Ok(())
            }
        }
    }

    /// Column-scoped update. Returns the updated row, or `None` if no
    /// profile has this id.
    pub async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<Option<Profile>, StoreError> {
        match &self.backend {
            Backend::Rest(client) => client.update(tables::PROFILES, "id", id, patch).await,
            Backend::Memory(map) => Ok(map.get_mut(id).map(|mut profile| {
                profile.apply(patch);
                profile.clone()
            })),
        }
    }
}

impl ProfileSource for ProfileStore {
    async fn profile_by_id(&self, subject_id: &str) -> Result<Option<Profile>, StoreError> {
        self.get_profile(subject_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileUpdate, Role};

    #[tokio::test]
    async fn test_memory_upsert_and_get() {
        let store = ProfileStore::new_mock();
        assert!(store.get_profile("user-1").await.unwrap().is_none());

        let mut profile = Profile::new_member("user-1", None);
        store.upsert_profile(&profile).await.unwrap();

        profile.role = Role::Volunteer;
        store.upsert_profile(&profile).await.unwrap();

        let stored = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Volunteer);
    }

    #[tokio::test]
    async fn test_settings_and_role_writes_do_not_overwrite_each_other() {
        let store = ProfileStore::new_mock();
        let mut profile = Profile::new_member("user-1", None);
        profile.role = Role::Admin;
        store.upsert_profile(&profile).await.unwrap();

        // Settings form built from a read taken before the demotion.
        let settings = ProfileUpdate {
            display_name: Some("Pat Doe".to_string()),
            campus: Some("Lincoln".to_string()),
            phone: None,
        }
        .into_patch();

        store
            .update_profile("user-1", &ProfilePatch::role(Role::Member))
            .await
            .unwrap()
            .unwrap();
        let updated = store
            .update_profile("user-1", &settings)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.role, Role::Member);
        assert_eq!(updated.display_name.as_deref(), Some("Pat Doe"));

        // And the reverse order keeps the settings.
        store
            .update_profile("user-1", &ProfilePatch::role(Role::Volunteer))
            .await
            .unwrap();
        let stored = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Volunteer);
        assert_eq!(stored.campus.as_deref(), Some("Lincoln"));
    }

    #[tokio::test]
    async fn test_update_missing_profile_is_none() {
        let store = ProfileStore::new_mock();
        let updated = store
            .update_profile("ghost", &ProfilePatch::role(Role::Admin))
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(store.get_profile("ghost").await.unwrap().is_none());
    }
}
