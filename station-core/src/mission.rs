// File:    mission.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: The mission record and its encrypted/decrypted lifecycle.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Mission records.
//!
//! A record is either [`RecordState::Encrypted`] (identifier and payload held
//! as sealed text) or [`RecordState::Decrypted`] (plaintext id and pad rows
//! available). Both halves change state together: a failed decryption or
//! encryption leaves the record exactly as it was.

use log::debug;

use crate::aead::{self, Transport};
use crate::error::{MissionError, Result};
use crate::session::SessionContext;

/// Pad rows of a mission, consumed strictly from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PadSheet {
    rows: Vec<String>,
}

impl PadSheet {
    /// Creates a sheet from rows of space-separated digit groups.
    #[must_use]
    pub const fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// Parses newline-separated rows. Blank lines are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { rows }
    }

    /// The newline-joined textual form that gets sealed.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }

    /// All rows, front first.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of unused rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether every row has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The next row to be used, if any.
    #[must_use]
    pub fn first_row(&self) -> Option<&str> {
        self.rows.first().map(String::as_str)
    }

    /// Row `index` with the group separators removed.
    #[must_use]
    pub fn row_digits(&self, index: usize) -> Option<String> {
        self.rows.get(index).map(|row| row.split_whitespace().collect())
    }

    /// The sheet that remains once the front row has been used.
    #[must_use]
    pub fn without_first_row(&self) -> Self {
        Self {
            rows: self.rows.iter().skip(1).cloned().collect(),
        }
    }
}

/// Which representation a record currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Identifier and payload are sealed text.
    Encrypted,
    /// Identifier and pad rows are available in plaintext.
    Decrypted,
}

/// The payload of a record in either representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `base64(nonce || ciphertext)` of the newline-joined rows.
    Sealed(String),
    /// Decrypted pad rows.
    Pad(PadSheet),
}

/// A mission: identifier plus one-time pad, protected at rest.
#[derive(Debug, Clone)]
pub struct MissionRecord {
    plain_id: Option<String>,
    stored_id: Option<String>,
    payload: Payload,
}

impl MissionRecord {
    /// A new, never-persisted mission in the decrypted state.
    #[must_use]
    pub fn new(plain_id: impl Into<String>, sheet: PadSheet) -> Self {
        Self {
            plain_id: Some(plain_id.into()),
            stored_id: None,
            payload: Payload::Pad(sheet),
        }
    }

    /// A mission as found on disk, in the encrypted state.
    #[must_use]
    pub fn sealed(stored_id: impl Into<String>, sealed_payload: impl Into<String>) -> Self {
        Self {
            plain_id: None,
            stored_id: Some(stored_id.into()),
            payload: Payload::Sealed(sealed_payload.into()),
        }
    }

    /// Current state, derived from the payload representation.
    #[must_use]
    pub const fn state(&self) -> RecordState {
        match self.payload {
            Payload::Sealed(_) => RecordState::Encrypted,
            Payload::Pad(_) => RecordState::Decrypted,
        }
    }

    /// Whether the plaintext view is available.
    #[must_use]
    pub const fn is_decrypted(&self) -> bool {
        matches!(self.state(), RecordState::Decrypted)
    }

    /// The canonical mission id, known once the record has been decrypted
    /// (or for records created in this session).
    #[must_use]
    pub fn plain_id(&self) -> Option<&str> {
        self.plain_id.as_deref()
    }

    /// The sealed id last written to or read from disk.
    #[must_use]
    pub fn stored_id(&self) -> Option<&str> {
        self.stored_id.as_deref()
    }

    /// The payload in its current representation.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The pad rows, if decrypted.
    #[must_use]
    pub const fn pad(&self) -> Option<&PadSheet> {
        match &self.payload {
            Payload::Pad(sheet) => Some(sheet),
            Payload::Sealed(_) => None,
        }
    }

    /// The sealed payload text, if encrypted.
    #[must_use]
    pub fn sealed_payload(&self) -> Option<&str> {
        match &self.payload {
            Payload::Sealed(text) => Some(text),
            Payload::Pad(_) => None,
        }
    }

    /// Opens the identifier and the payload with the session key.
    ///
    /// Does nothing if the record is already decrypted. Both halves must open
    /// before anything is changed.
    ///
    /// # Errors
    ///
    /// [`MissionError::InvalidKeyLength`], [`MissionError::MalformedCiphertext`]
    /// or [`MissionError::AuthenticationFailed`]; the record stays encrypted.
    pub fn decrypt(&mut self, session: &SessionContext) -> Result<()> {
        let Payload::Sealed(sealed_payload) = &self.payload else {
            return Ok(());
        };
        let stored_id = self
            .stored_id
            .as_deref()
            .ok_or_else(|| MissionError::MalformedCiphertext("record has no stored id".into()))?;

        let plain_id = utf8(aead::open(stored_id, session.key(), Transport::Filename)?)?;
        let text = utf8(aead::open(sealed_payload, session.key(), Transport::Standard)?)?;

        debug!("Decrypted mission {plain_id}");
        self.plain_id = Some(plain_id);
        self.payload = Payload::Pad(PadSheet::parse(&text));
        Ok(())
    }

    /// Seals the payload and the identifier under independent nonces.
    ///
    /// # Errors
    ///
    /// [`MissionError::NotDecrypted`] if there is no plaintext to seal, plus
    /// any sealing error; the record is left decrypted on failure.
    pub fn encrypt(&mut self, session: &SessionContext) -> Result<()> {
        let (Payload::Pad(sheet), Some(plain_id)) = (&self.payload, &self.plain_id) else {
            return Err(MissionError::NotDecrypted);
        };

        let sealed_payload = aead::seal(sheet.to_text().as_bytes(), session.key(), Transport::Standard)?;
        let stored_id = aead::seal(plain_id.as_bytes(), session.key(), Transport::Filename)?;

        debug!("Encrypted mission {plain_id}");
        self.stored_id = Some(stored_id);
        self.payload = Payload::Sealed(sealed_payload);
        Ok(())
    }

    /// Replaces the pad rows of a decrypted record without sealing them.
    ///
    /// # Errors
    ///
    /// Returns [`MissionError::NotDecrypted`] for an encrypted record.
    pub(crate) fn set_pad(&mut self, sheet: PadSheet) -> Result<()> {
        if !self.is_decrypted() {
            return Err(MissionError::NotDecrypted);
        }
        self.payload = Payload::Pad(sheet);
        Ok(())
    }

    /// Swaps in sealed payload text read back from disk.
    pub(crate) fn reload_sealed(&mut self, sealed_payload: String) {
        self.payload = Payload::Sealed(sealed_payload);
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| MissionError::MalformedCiphertext(e.to_string()))
}
