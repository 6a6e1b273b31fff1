// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by the hosting platform and
//! read once at startup.

use crate::services::cipher;
use std::env;

/// Where guard failures send the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    /// Destination for requests without a valid session.
    pub login_path: String,
    /// Destination for authenticated requests with an insufficient role.
    pub deny_path: String,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            deny_path: "/".to_string(),
        }
    }
}

/// Hosted Postgres REST backend settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Base URL of the project, e.g. `https://xyz.supabase.co`
    pub rest_url: String,
    /// Service role key (server-side only)
    pub service_key: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Login and deny destinations
    pub redirects: RedirectPolicy,

    // --- Secrets ---
    /// HS256 key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// 64-hex-char AES-256 key for third-party credentials.
    /// Absence is only detected when a credential is encrypted or decrypted.
    pub token_encryption_key: Option<String>,
    /// Profile/credential backend. `None` selects the in-memory stores.
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            redirects: RedirectPolicy::default(),
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            token_encryption_key: Some("00".repeat(32)),
            database: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let token_encryption_key = optional_var("TOKEN_ENCRYPTION_KEY");
        if let Some(key) = &token_encryption_key {
            if !cipher::is_valid_key_format(key) {
                return Err(ConfigError::Invalid(
                    "TOKEN_ENCRYPTION_KEY",
                    "expected 64 hexadecimal characters",
                ));
            }
        }

        let database = match (
            optional_var("DATABASE_REST_URL"),
            optional_var("DATABASE_SERVICE_KEY"),
        ) {
            (Some(rest_url), Some(service_key)) => Some(DatabaseConfig {
                rest_url: rest_url.trim_end_matches('/').to_string(),
                service_key,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("DATABASE_SERVICE_KEY")),
            (None, Some(_)) => return Err(ConfigError::Missing("DATABASE_REST_URL")),
        };

        let defaults = RedirectPolicy::default();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            redirects: RedirectPolicy {
                login_path: optional_var("LOGIN_PATH").unwrap_or(defaults.login_path),
                deny_path: optional_var("DENY_PATH").unwrap_or(defaults.deny_path),
            },
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            token_encryption_key,
            database,
        })
    }
}

/// Read a variable, treating empty or whitespace-only values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
