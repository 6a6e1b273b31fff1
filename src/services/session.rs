// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed session tokens.
//!
//! The auth provider completes sign-in and hands the portal an HS256 JWT,
//! carried in the `pta_session` cookie or a bearer header.

use crate::error::StoreError;
use crate::models::SessionUser;
use crate::services::resolver::SessionSource;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "pta_session";

/// Session lifetime in seconds (30 days).
const SESSION_TTL_SECS: usize = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (auth provider user id)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// HS256 signing and verification keys.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Create a session token for a user.
    pub fn issue(&self, subject_id: &str, email: &str) -> anyhow::Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a session token and return its subject.
    pub fn verify(&self, token: &str) -> Result<SessionUser, StoreError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| StoreError::InvalidSession(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(StoreError::InvalidSession("empty subject".to_string()));
        }

        Ok(SessionUser {
            subject_id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Extract the raw session token from a request: cookie first, then header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Session store view for one request.
#[derive(Clone)]
pub struct CookieSession {
    token: Option<String>,
    keys: Arc<SessionKeys>,
}

impl CookieSession {
    pub fn new(token: Option<String>, keys: Arc<SessionKeys>) -> Self {
        Self { token, keys }
    }
}

impl SessionSource for CookieSession {
    async fn current_session_user(&self) -> Result<Option<SessionUser>, StoreError> {
        match &self.token {
            None => Ok(None),
            Some(token) => self.keys.verify(token).map(Some),
        }
    }
}
