// File:    session.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Holds the symmetric key for one session and handles key generation and import.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Session key handling.
//!
//! There is no process-wide key. A [`SessionContext`] is created once per
//! session and passed by reference into every record and store operation.
//! The key bytes are not zeroized when the context is dropped.

use std::fmt;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::info;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::aead;
use crate::error::{MissionError, Result};

/// Length of keys produced by [`SessionContext::generate`].
pub const GENERATED_KEY_LEN: usize = 32;

/// The symmetric key in use for one session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    key: Vec<u8>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Wraps raw key bytes. The length is checked by each sealing operation.
    #[must_use]
    pub const fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    /// Imports a base64-encoded key, as typed by an operator or read from a key file.
    ///
    /// # Errors
    ///
    /// [`MissionError::InvalidKeyEncoding`] if the text is not base64 and
    /// [`MissionError::InvalidKeyLength`] if it does not decode to 16, 24 or
    /// 32 bytes.
    pub fn from_base64(text: &str) -> Result<Self> {
        let key = STANDARD
            .decode(text.trim())
            .map_err(|_| MissionError::InvalidKeyEncoding)?;
        aead::check_key(&key)?;
        Ok(Self { key })
    }

    /// Reads a key file written by [`SessionContext::write_key_file`].
    ///
    /// # Errors
    ///
    /// Propagates I/O failures and the errors of [`SessionContext::from_base64`].
    pub fn from_key_file(path: &Path) -> Result<Self> {
        Self::from_base64(&fs::read_to_string(path)?)
    }

    /// Generates a fresh 256-bit key from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::EntropyUnavailable`] if the OS random source fails.
    pub fn generate() -> Result<Self> {
        let mut key = vec![0u8; GENERATED_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| MissionError::EntropyUnavailable(e.to_string()))?;
        info!("Generated new {}-bit AES-GCM key", GENERATED_KEY_LEN * 8);
        Ok(Self { key })
    }

    /// The key as standard base64 text.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.key)
    }

    /// Saves the key as base64 text to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::PersistenceFailure`] if the file cannot be written.
    pub fn write_key_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_base64())?;
        info!("Key saved to {}", path.display());
        Ok(())
    }

    /// Raw key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}
