// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request-scoped identity resolution and role guards.
//!
//! A [`RequestContext`] is built for every incoming request. The first call
//! to [`RequestContext::resolve_identity`] performs at most one session lookup
//! and one profile lookup; every later call in the same request reuses that
//! result. Store failures resolve to "no identity".

use crate::config::RedirectPolicy;
use crate::error::StoreError;
use crate::models::{Identity, Profile, Role, SessionUser};
use axum::response::{IntoResponse, Redirect, Response};
use std::future::Future;
use tokio::sync::OnceCell;

/// Source of the authenticated session subject for the current request.
pub trait SessionSource: Send + Sync {
    fn current_session_user(
        &self,
    ) -> impl Future<Output = Result<Option<SessionUser>, StoreError>> + Send;
}

/// Profile lookup keyed by session subject id.
pub trait ProfileSource: Send + Sync {
    fn profile_by_id(
        &self,
        subject_id: &str,
    ) -> impl Future<Output = Result<Option<Profile>, StoreError>> + Send;
}

/// A set of accepted roles: a single [`Role`] or any collection of them.
pub trait RoleSet {
    fn contains_role(&self, role: Role) -> bool;
}

impl RoleSet for Role {
    fn contains_role(&self, role: Role) -> bool {
        *self == role
    }
}

impl RoleSet for [Role] {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl<const N: usize> RoleSet for [Role; N] {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

impl RoleSet for Vec<Role> {
    fn contains_role(&self, role: Role) -> bool {
        self.contains(&role)
    }
}

/// Why a guard refused the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No valid session.
    Unauthenticated,
    /// Valid session, but no profile or a role outside the accepted set.
    Unauthorized,
}

/// Guard outcome that ends the request with a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denied {
    pub reason: DenialReason,
    pub destination: String,
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        Redirect::to(&self.destination).into_response()
    }
}

/// Per-request resolver. Never share one between requests.
pub struct RequestContext<S, P> {
    session: S,
    profiles: P,
    redirects: RedirectPolicy,
    identity: OnceCell<Option<Identity>>,
}

impl<S: SessionSource, P: ProfileSource> RequestContext<S, P> {
    pub fn new(session: S, profiles: P, redirects: RedirectPolicy) -> Self {
        Self {
            session,
            profiles,
            redirects,
            identity: OnceCell::new(),
        }
    }

    /// The caller for this request, or `None` without a valid session.
    pub async fn resolve_identity(&self) -> Option<&Identity> {
        self.identity
            .get_or_init(|| self.load_identity())
            .await
            .as_ref()
    }

    async fn load_identity(&self) -> Option<Identity> {
        let user = match self.session.current_session_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating as signed out");
                return None;
            }
        };

        let profile = match self.profiles.profile_by_id(&user.subject_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    subject = %user.subject_id,
                    error = %e,
                    "Profile lookup failed, treating as signed out"
                );
                return None;
            }
        };

        if profile.is_none() {
            tracing::debug!(subject = %user.subject_id, "Session has no provisioned profile");
        }

        Some(Identity::new(user, profile))
    }

    /// Identity, or a redirect to the login destination.
    pub async fn require_authenticated(&self) -> Result<&Identity, Denied> {
        self.resolve_identity().await.ok_or_else(|| Denied {
            reason: DenialReason::Unauthenticated,
            destination: self.redirects.login_path.clone(),
        })
    }

    /// Identity whose role is in `accepted`, or a redirect.
    ///
    /// A missing profile always redirects to the deny destination.
    pub async fn require_role<R>(&self, accepted: &R) -> Result<&Identity, Denied>
    where
        R: RoleSet + ?Sized,
    {
        let identity = self.require_authenticated().await?;

        match identity.role() {
            Some(role) if accepted.contains_role(role) => Ok(identity),
            role => {
                tracing::info!(
                    subject = %identity.subject_id,
                    role = ?role,
                    "Role check failed"
                );
                Err(Denied {
                    reason: DenialReason::Unauthorized,
                    destination: self.redirects.deny_path.clone(),
                })
            }
        }
    }

    /// Non-terminating role check.
    pub async fn has_role<R>(&self, accepted: &R) -> bool
    where
        R: RoleSet + ?Sized,
    {
        self.resolve_identity()
            .await
            .and_then(Identity::role)
            .is_some_and(|role| accepted.contains_role(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<SessionUser>);

    impl SessionSource for Fixed {
        async fn current_session_user(&self) -> Result<Option<SessionUser>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct NoProfiles;

    impl ProfileSource for NoProfiles {
        async fn profile_by_id(&self, _subject_id: &str) -> Result<Option<Profile>, StoreError> {
            Ok(None)
        }
    }

    #[test]
    fn test_role_sets() {
        assert!(Role::Admin.contains_role(Role::Admin));
        assert!(!Role::Admin.contains_role(Role::SuperAdmin));
        assert!(Role::ADMINS.contains_role(Role::SuperAdmin));
        assert!(!Role::VOLUNTEERS.contains_role(Role::Member));
        assert!(vec![Role::Member].contains_role(Role::Member));
        let slice: &[Role] = &[];
        assert!(!slice.contains_role(Role::Member));
    }

    #[tokio::test]
    async fn test_denied_redirects_to_destination() {
        let ctx = RequestContext::new(Fixed(None), NoProfiles, RedirectPolicy::default());
        let denied = ctx.require_authenticated().await.unwrap_err();
        let response = denied.into_response();

        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[tokio::test]
    async fn test_unprovisioned_identity_is_resolved_without_role() {
        let user = SessionUser {
            subject_id: "user-1".to_string(),
            email: "pat@example.org".to_string(),
        };
        let ctx = RequestContext::new(Fixed(Some(user)), NoProfiles, RedirectPolicy::default());

        let identity = ctx.resolve_identity().await.unwrap();
        assert_eq!(identity.subject_id, "user-1");
        assert_eq!(identity.role(), None);
    }
}
