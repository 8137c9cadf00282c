// File:    error.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Error taxonomy shared by the pad, cipher, sealing and storage layers.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Error types for the station core.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MissionError>;

/// Everything that can go wrong while handling missions.
#[derive(Error, Debug)]
pub enum MissionError {
    /// The session key is not 16, 24 or 32 bytes long.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// No session key was supplied.
    #[error("no session key supplied")]
    MissingKey,

    /// The session key text is not valid base64.
    #[error("session key is not valid base64")]
    InvalidKeyEncoding,

    /// The tag check failed: wrong key or tampered ciphertext.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The transport string could not be decoded or is too short to hold a nonce.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The AEAD primitive refused to seal the plaintext.
    #[error("encryption failed")]
    EncryptionFailed,

    /// The operating system random source could not be read.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// The pad holds fewer digits than the message needs.
    #[error("pad is too short for this message: {pad} < {message}")]
    PadTooShort {
        /// Number of pad digits available.
        pad: usize,
        /// Number of message digits requested.
        message: usize,
    },

    /// A digit string contained something other than `0`-`9`.
    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit {
        /// Zero-based index of the offending character.
        position: usize,
        /// The character that was found.
        found: char,
    },

    /// Nothing encodable was left in a broadcast message.
    #[error("message is empty after removing unsupported characters")]
    EmptyMessage,

    /// The operation needs the decrypted view of the record.
    #[error("mission is not decrypted")]
    NotDecrypted,

    /// No backing file exists for the requested mission.
    #[error("mission not found: {0}")]
    MissionNotFound(String),

    /// Reading or writing the store failed.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] std::io::Error),

    /// The store configuration could not be parsed or written.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The store configuration parsed but describes an unusable layout.
    #[error("invalid store config: {0}")]
    InvalidConfig(String),

    /// Every mission id of the configured length is already taken.
    #[error("no free mission ids of length {length} ({taken} in use)")]
    IdSpaceExhausted {
        /// Configured id length.
        length: usize,
        /// Number of ids already in use.
        taken: usize,
    },
}

impl MissionError {
    /// Whether the error means "this record was not sealed under this key".
    ///
    /// Listing treats these as a reason to skip a record rather than fail.
    #[must_use]
    pub const fn is_key_mismatch(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::MalformedCiphertext(_)
        )
    }
}
