// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AES-256-GCM encryption for third-party OAuth tokens.
//!
//! Encoded secrets are three hex fields joined by `:`:
//! `<16-byte IV>:<16-byte auth tag>:<ciphertext>`. The 16-byte IV matches the
//! format already stored by the portal, so the GCM nonce size is 16 rather
//! than the usual 12.
//!
//! Every failure is reported as the same opaque [`CipherError`] message; the
//! specific cause is only logged.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use std::str::FromStr;

/// AES-256-GCM with a 128-bit nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Key length in hex characters (256 bits).
pub const KEY_HEX_LEN: usize = 64;
/// IV length in bytes.
pub const IV_LEN: usize = 16;
/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Field separator in the encoded form.
pub const DELIMITER: char = ':';

/// Cipher failure. All variants display the same message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    /// Key missing or not 64 hex characters.
    #[error("credential encryption or decryption failed")]
    Configuration,
    /// Encoded value is not `iv:tag:ciphertext` hex.
    #[error("credential encryption or decryption failed")]
    Format,
    /// Tag verification failed.
    #[error("credential encryption or decryption failed")]
    Integrity,
    /// The OS random source failed.
    #[error("credential encryption or decryption failed")]
    Entropy,
}

/// Returns true for exactly 64 characters of `[0-9a-fA-F]`.
pub fn is_valid_key_format(candidate: &str) -> bool {
    candidate.len() == KEY_HEX_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Generate a fresh random 256-bit key as 64 lowercase hex characters.
///
/// Operator utility for initial setup; the cipher never generates keys itself.
pub fn generate_key() -> Result<String, CipherError> {
    let mut key = [0u8; KEY_HEX_LEN / 2];
    SystemRandom::new().fill(&mut key).map_err(|_| {
        tracing::error!("System random source failed during key generation");
        CipherError::Entropy
    })?;
    Ok(hex::encode(key))
}

/// Encrypt `plaintext` under the hex `key`, returning `iv:tag:ciphertext`.
pub fn encrypt(plaintext: &str, key: Option<&str>) -> Result<String, CipherError> {
    Ok(EncryptedSecret::seal(plaintext, key)?.to_string())
}

/// Decrypt an `iv:tag:ciphertext` value produced by [`encrypt`].
pub fn decrypt(encoded: &str, key: Option<&str>) -> Result<String, CipherError> {
    let cipher = cipher_for(key)?;
    let secret: EncryptedSecret = encoded.parse()?;
    secret.open_with(&cipher)
}

fn cipher_for(key: Option<&str>) -> Result<Aes256Gcm16, CipherError> {
    let key = key.ok_or_else(|| {
        tracing::error!("Token encryption key is not configured");
        CipherError::Configuration
    })?;

    if !is_valid_key_format(key) {
        tracing::error!(
            length = key.len(),
            "Token encryption key must be 64 hexadecimal characters"
        );
        return Err(CipherError::Configuration);
    }

    let bytes = hex::decode(key).map_err(|_| CipherError::Configuration)?;
    Aes256Gcm16::new_from_slice(&bytes).map_err(|_| CipherError::Configuration)
}

/// At-rest form of a protected credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    iv: [u8; IV_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedSecret {
    /// Encrypt with a freshly drawn IV.
    pub fn seal(plaintext: &str, key: Option<&str>) -> Result<Self, CipherError> {
        let cipher = cipher_for(key)?;

        let mut iv = [0u8; IV_LEN];
        SystemRandom::new().fill(&mut iv).map_err(|_| {
            tracing::error!("System random source failed while drawing IV");
            CipherError::Entropy
        })?;

        let mut ciphertext = plaintext.as_bytes().to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut ciphertext)
            .map_err(|_| {
                tracing::error!(length = plaintext.len(), "AES-GCM encryption failed");
                CipherError::Format
            })?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(Self {
            iv,
            tag: tag_bytes,
            ciphertext,
        })
    }

    /// Verify the tag and recover the plaintext.
    pub fn open(&self, key: Option<&str>) -> Result<String, CipherError> {
        let cipher = cipher_for(key)?;
        self.open_with(&cipher)
    }

    fn open_with(&self, cipher: &Aes256Gcm16) -> Result<String, CipherError> {
        // Decrypt into a scratch buffer so nothing leaks on tag failure.
        let mut buffer = self.ciphertext.clone();
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&self.iv),
                b"",
                &mut buffer,
                Tag::<U16>::from_slice(&self.tag),
            )
            .map_err(|_| {
                tracing::warn!("Credential authentication tag did not verify");
                CipherError::Integrity
            })?;

        String::from_utf8(buffer).map_err(|_| {
            tracing::warn!("Decrypted credential is not valid UTF-8");
            CipherError::Integrity
        })
    }
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedSecret {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(DELIMITER).collect();
        let [iv_hex, tag_hex, ciphertext_hex] = parts.as_slice() else {
            tracing::warn!(
                parts = parts.len(),
                "Encrypted credential must have exactly three parts"
            );
            return Err(CipherError::Format);
        };

        let iv = decode_fixed::<IV_LEN>(iv_hex, "iv")?;
        let tag = decode_fixed::<TAG_LEN>(tag_hex, "tag")?;
        let ciphertext = hex::decode(ciphertext_hex).map_err(|e| {
            tracing::warn!(error = %e, "Encrypted credential ciphertext is not hex");
            CipherError::Format
        })?;

        Ok(Self {
            iv,
            tag,
            ciphertext,
        })
    }
}

fn decode_fixed<const N: usize>(field: &str, name: &'static str) -> Result<[u8; N], CipherError> {
    let mut out = [0u8; N];
    hex::decode_to_slice(field, &mut out).map_err(|e| {
        tracing::warn!(field = name, error = %e, "Encrypted credential field is malformed");
        CipherError::Format
    })?;
    Ok(out)
}
