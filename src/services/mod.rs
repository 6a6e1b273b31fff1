// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cipher;
pub mod resolver;
pub mod session;
pub mod vault;

pub use cipher::{CipherError, EncryptedSecret};
pub use resolver::{
    DenialReason, Denied, ProfileSource, RequestContext, RoleSet, SessionSource,
};
pub use session::{CookieSession, SessionKeys};
pub use vault::{ConnectRequest, CredentialVault, IntegrationStatus};
