// File:    aead.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Seals and opens byte strings with AES-GCM, framing the nonce in front of the ciphertext.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! AEAD sealing for mission identifiers and payloads.
//!
//! A sealed value is `base64(nonce || ciphertext)`, where the nonce is 12
//! fresh random bytes per call and the associated data is empty. The key
//! length picks the cipher: 16, 24 or 32 bytes select AES-128, AES-192 or
//! AES-256 in GCM mode.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use log::debug;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::error::{MissionError, Result};

/// Length of the random nonce prefixed to every sealed value.
pub const NONCE_LEN: usize = 12;

/// Key lengths accepted by [`seal`] and [`open`].
pub const VALID_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

type Aes192Gcm = AesGcm<Aes192, U12>;

/// URL-safe alphabet without padding: `/` becomes `_`, `+` becomes `-`.
/// Decoding accepts input with or without the trailing `=`.
const FILENAME_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How a sealed value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Standard base64 with padding, used for file contents.
    Standard,
    /// Filesystem-safe base64, used for file names.
    Filename,
}

impl Transport {
    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Standard => STANDARD.encode(bytes),
            Self::Filename => FILENAME_SAFE.encode(bytes),
        }
    }

    fn decode(self, text: &str) -> Result<Vec<u8>> {
        let decoded = match self {
            Self::Standard => STANDARD.decode(text),
            Self::Filename => FILENAME_SAFE.decode(text),
        };
        decoded.map_err(|e| MissionError::MalformedCiphertext(e.to_string()))
    }
}

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| MissionError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            n => Err(MissionError::InvalidKeyLength(n)),
        }
    }

    fn encrypt(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let sealed = match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| MissionError::EncryptionFailed)
    }

    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        let opened = match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        };
        opened.map_err(|_| MissionError::AuthenticationFailed)
    }
}

/// Checks that `key` has one of the [`VALID_KEY_LENGTHS`].
///
/// # Errors
///
/// Returns [`MissionError::InvalidKeyLength`] otherwise.
pub fn check_key(key: &[u8]) -> Result<()> {
    if VALID_KEY_LENGTHS.contains(&key.len()) {
        Ok(())
    } else {
        Err(MissionError::InvalidKeyLength(key.len()))
    }
}

/// Generates a random 12-byte nonce from the operating system.
///
/// # Errors
///
/// Returns [`MissionError::EntropyUnavailable`] if the OS random source fails.
pub fn nonce() -> Result<[u8; NONCE_LEN]> {
    let mut n = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut n)
        .map_err(|e| MissionError::EntropyUnavailable(e.to_string()))?;
    Ok(n)
}

/// Seals `plaintext` under `key` and encodes `nonce || ciphertext` as text.
///
/// The key is validated before a nonce is drawn.
///
/// # Errors
///
/// [`MissionError::InvalidKeyLength`] for a bad key,
/// [`MissionError::EntropyUnavailable`] if no nonce can be drawn, and
/// [`MissionError::EncryptionFailed`] if the cipher rejects the input.
pub fn seal(plaintext: &[u8], key: &[u8], transport: Transport) -> Result<String> {
    let cipher = Cipher::new(key)?;
    let nonce = nonce()?;
    let ciphertext = cipher.encrypt(&nonce, plaintext)?;

    let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&ciphertext);
    debug!("Sealed {} bytes ({transport:?})", plaintext.len());
    Ok(transport.encode(&framed))
}

/// Reverses [`seal`].
///
/// # Errors
///
/// [`MissionError::InvalidKeyLength`] for a bad key,
/// [`MissionError::MalformedCiphertext`] if the text does not decode or is
/// shorter than a nonce, and [`MissionError::AuthenticationFailed`] if the tag
/// does not verify.
pub fn open(sealed: &str, key: &[u8], transport: Transport) -> Result<Vec<u8>> {
    let cipher = Cipher::new(key)?;
    let framed = transport.decode(sealed)?;
    if framed.len() < NONCE_LEN {
        return Err(MissionError::MalformedCiphertext(format!(
            "{} bytes is shorter than the {NONCE_LEN}-byte nonce",
            framed.len()
        )));
    }
    let (nonce, ciphertext) = framed.split_at(NONCE_LEN);
    cipher.decrypt(nonce, ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_transport_has_no_unsafe_characters() {
        let bytes: Vec<u8> = (0..=255).collect();
        let encoded = Transport::Filename.encode(&bytes);
        assert!(!encoded.contains(['/', '+', '=']));
        assert_eq!(Transport::Filename.decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_filename_transport_accepts_restored_padding() {
        let encoded = Transport::Filename.encode(b"F1YNE");
        let padded = format!("{encoded}{}", "=".repeat((4 - encoded.len() % 4) % 4));
        assert_eq!(Transport::Filename.decode(&padded).unwrap(), b"F1YNE");
    }
}
