// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PTA Portal API Server
//!
//! Member accounts, role-gated volunteer and admin areas, and encrypted
//! storage for third-party integration credentials.

use pta_portal::{
    config::Config,
    db::{CredentialStore, PostgrestClient, ProfileStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting PTA Portal API");

    if config.token_encryption_key.is_none() {
        tracing::warn!(
            "TOKEN_ENCRYPTION_KEY is not set; connecting integrations will fail until it is"
        );
    }

    let (profiles, credentials) = match &config.database {
        Some(db) => {
            let client = PostgrestClient::new(db);
            tracing::info!(url = %db.rest_url, "Using hosted database");
            (ProfileStore::new(client.clone()), CredentialStore::new(client))
        }
        None => {
            tracing::warn!("DATABASE_REST_URL not set; using in-memory stores");
            (ProfileStore::new_mock(), CredentialStore::new_mock())
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), profiles, credentials));

    // Build router
    let app = pta_portal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pta_portal=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
