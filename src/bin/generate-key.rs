// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Print a fresh TOKEN_ENCRYPTION_KEY.
//!
//! Run once during setup and store the output in the deployment's secrets.
//! Rotating the key makes every stored integration credential unreadable.

use pta_portal::services::cipher;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key = cipher::generate_key()?;
    println!("{}", key);
    Ok(())
}
